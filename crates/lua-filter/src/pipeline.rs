//! The pipeline-callback interface the session consumes (§4.3, §6).
//!
//! The filter adapter never assumes a concrete connection manager: it is
//! generic over anything that can log a script message, append a late
//! chunk to the buffered body, and hand back whatever has been buffered so
//! far. This mirrors the teacher's `Handler`/`LocalHandler` split
//! (`micro_http::handler`), which keeps the HTTP engine generic over the
//! thing plugged into it rather than hard-coding one connection type.

use bytes::{Bytes, BytesMut};

/// Consumed by [`crate::FilterAdapter`] / [`crate::session::RequestSession`].
///
/// Implemented by whatever owns the request's decode-side buffer. The
/// default in this crate, [`BufferedBody`], accumulates chunks the way a
/// real connection manager's request buffer would.
pub trait PipelineCallbacks {
    /// Forwards a script `log(level, message)` call to wherever the host
    /// wants script logs to land, in addition to the `tracing` emission the
    /// filter itself performs (see §6).
    fn script_log(&self, level: i64, message: &str);

    /// Appends a late-arriving chunk to the pipeline's accumulated buffer.
    fn add_data(&mut self, data: Bytes);

    /// Returns the currently accumulated decoded body, or `None` if nothing
    /// has been buffered.
    fn buffered_body(&self) -> Option<Bytes>;
}

/// A minimal, realistic [`PipelineCallbacks`] implementation: accumulates
/// chunks into a growing buffer and forwards script logs through `tracing`.
///
/// This is what a connection manager embedding this filter would plug in
/// (or a close relative of it); it's also what the crate's own tests use.
#[derive(Debug, Default)]
pub struct BufferedBody {
    buffer: BytesMut,
    has_data: bool,
}

impl BufferedBody {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PipelineCallbacks for BufferedBody {
    fn script_log(&self, level: i64, message: &str) {
        tracing::info!(target: "lua_script", level, "{message}");
    }

    fn add_data(&mut self, data: Bytes) {
        self.has_data = true;
        self.buffer.extend_from_slice(&data);
    }

    fn buffered_body(&self) -> Option<Bytes> {
        if self.has_data { Some(self.buffer.clone().freeze()) } else { None }
    }
}
