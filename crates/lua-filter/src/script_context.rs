//! Per-worker script context (§4.4).
//!
//! Holds one compiled script and one `mlua::Lua` runtime, and vends a fresh
//! coroutine (wrapped in a [`RequestSession`]) per request. One context per
//! worker thread: `mlua::Lua` is `!Send`, so a [`ScriptContext`] can't
//! accidentally end up shared across threads. The type system enforces the
//! "thread-local, no cross-thread locking" requirement from §5 rather than
//! a comment asserting it.

use http::HeaderMap;
use mlua::{Function, Lua};

use crate::config::{ENTRY_POINT, FilterConfig};
use crate::error::{ConfigError, FilterError};
use crate::pipeline::PipelineCallbacks;
use crate::session::RequestSession;

const PRELUDE_SRC: &str = include_str!("prelude.lua");

pub struct ScriptContext {
    lua: Lua,
    entry_point: Function,
    make_handle: Function,
}

impl ScriptContext {
    /// Compiles `config`'s script and the stream-handle prelude. Returns a
    /// [`ConfigError`] if the script fails to compile or never defines
    /// `envoy_on_request`. This filter does not install on such a
    /// configuration (§7 kind 5).
    pub fn new(config: &FilterConfig) -> Result<Self, ConfigError> {
        let lua = Lua::new();
        lua.load(&config.inline_code).exec()?;

        let entry_point: Function = lua
            .globals()
            .get(ENTRY_POINT)
            .map_err(|_| ConfigError::MissingEntryPoint { name: ENTRY_POINT })?;

        let make_handle: Function = lua.load(PRELUDE_SRC).eval()?;

        Ok(Self { lua, entry_point, make_handle })
    }

    /// Vends a fresh coroutine for one request and starts it running,
    /// mirroring `Filter::decodeHeaders` creating a coroutine from the
    /// per-worker context and calling `StreamHandleWrapper::start`.
    pub fn create_session<P>(
        &self,
        headers: HeaderMap,
        end_stream: bool,
        callbacks: P,
    ) -> Result<RequestSession, FilterError>
    where
        P: PipelineCallbacks + 'static,
    {
        RequestSession::start(&self.lua, &self.entry_point, &self.make_handle, headers, end_stream, callbacks)
    }

    /// Triggers a garbage-collection cycle in the per-worker runtime. Call
    /// this once a request has definitively ended (§4.4): nothing else
    /// drives Lua GC on a schedule in this revision.
    pub fn collect_garbage(&self) {
        self.lua.gc_collect().ok();
    }
}

impl std::fmt::Debug for ScriptContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptContext").finish_non_exhaustive()
    }
}
