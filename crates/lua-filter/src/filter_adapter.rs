//! The filter adapter (§4.3): receives decode callbacks from the HTTP
//! pipeline and forwards them to the request session.
//!
//! One [`FilterAdapter`] per request/stream (its `decode_headers` replaces
//! whatever session it was holding, mirroring the filter being destroyed
//! and recreated per stream in a real connection manager). In this crate it
//! is the caller's job to construct one `FilterAdapter` per decoded
//! request, the same way `micro_http`'s connection loop processes one
//! request at a time per `do_process` call.

use bytes::Bytes;
use http::HeaderMap;

use crate::pipeline::PipelineCallbacks;
use crate::script_context::ScriptContext;
use crate::session::{FilterStatus, RequestSession};

#[derive(Debug, Default)]
pub struct FilterAdapter {
    session: Option<RequestSession>,
}

impl FilterAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always returns `Continue`: the filter is purely observational in
    /// this revision (§4.3). Buffering is driven entirely by `decode_data`'s
    /// own return value.
    pub fn decode_headers<P>(&mut self, ctx: &ScriptContext, headers: HeaderMap, end_stream: bool, callbacks: P) -> FilterStatus
    where
        P: PipelineCallbacks + 'static,
    {
        match ctx.create_session(headers, end_stream, callbacks) {
            Ok(session) => self.session = Some(session),
            Err(error) => {
                tracing::error!(%error, "lua filter session failed to start; request proceeds unmodified");
                self.session = None;
            }
        }

        FilterStatus::Continue
    }

    pub fn decode_data(&mut self, data: Bytes, end_stream: bool) -> FilterStatus {
        let Some(session) = self.session.as_mut() else {
            return FilterStatus::Continue;
        };

        match session.decode_data(data, end_stream) {
            Ok(status) => status,
            Err(error) => {
                tracing::error!(%error, "lua filter script error on decodeData; stopping script interaction");
                FilterStatus::Continue
            }
        }
    }

    pub fn decode_trailers(&mut self, trailers: HeaderMap) -> FilterStatus {
        let Some(session) = self.session.as_mut() else {
            return FilterStatus::Continue;
        };

        match session.decode_trailers(trailers) {
            Ok(status) => status,
            Err(error) => {
                tracing::error!(%error, "lua filter script error on decodeTrailers; stopping script interaction");
                FilterStatus::Continue
            }
        }
    }

    /// Whether the current session's coroutine has reached its terminal
    /// state (returned, or errored). `false` if no session has been
    /// created yet.
    pub fn is_finished(&self) -> bool {
        self.session.as_ref().is_some_and(RequestSession::is_finished)
    }
}
