//! Filter configuration (§4.4, §7 kind 5).
//!
//! Configuration-time errors (a script that fails to compile, or compiles
//! but never defines `envoy_on_request`) are surfaced here rather than
//! discovered per-request, matching the teacher's pattern of a typed error
//! at the boundary where a resource is constructed
//! (`micro_http::protocol::error::ParseError`/`SendError`).

use serde::Deserialize;

use crate::error::ConfigError;

pub(crate) const ENTRY_POINT: &str = "envoy_on_request";

/// The source of a filter's script, as it would be deserialized from a
/// connection manager's filter-chain configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Inline Lua source for the request-decode script.
    pub inline_code: String,
}

impl FilterConfig {
    pub fn new(inline_code: impl Into<String>) -> Self {
        Self { inline_code: inline_code.into() }
    }

    /// Validates that the configured source compiles and defines the
    /// required entry point, without yet creating a per-worker runtime for
    /// it. `ScriptContext::new` performs the equivalent check when it loads
    /// the source into a real `mlua::Lua`; this is the cheap, allocation-free
    /// version a config loader can call before ever spinning up a worker.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lua = mlua::Lua::new();
        lua.load(&self.inline_code).exec()?;
        lua.globals().get::<mlua::Function>(ENTRY_POINT).map_err(|_| ConfigError::MissingEntryPoint {
            name: ENTRY_POINT,
        })?;
        Ok(())
    }
}
