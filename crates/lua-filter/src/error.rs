//! Error types for the Lua request filter.
//!
//! Mirrors `micro_http::protocol::error`'s split between a top-level error
//! and the specific causes: [`ConfigError`] covers problems discovered while
//! building a [`crate::FilterConfig`] (script fails to compile, missing entry
//! point); [`FilterError`] covers everything that can go wrong once a
//! request session is running.

use thiserror::Error;

/// Errors raised while compiling a script into a [`crate::FilterConfig`].
///
/// These surface at configuration time, not per-request: a filter that
/// fails to construct never gets installed in the pipeline.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The script source did not compile.
    #[error("lua script failed to compile: {source}")]
    Compile {
        #[from]
        source: mlua::Error,
    },

    /// The script compiled but does not define the required entry point.
    #[error("lua script does not define a global `{name}` function")]
    MissingEntryPoint { name: &'static str },
}

/// Errors raised while driving a request session's coroutine.
///
/// Per §7 of the specification: script runtime errors and contract
/// violations both terminate the session; no error here is retried, and
/// none produces a user-visible HTTP error. The caller simply stops
/// interacting with the coroutine and lets the request proceed unmodified.
#[derive(Error, Debug)]
pub enum FilterError {
    /// The script raised an error, or a type mismatch/misuse occurred while
    /// resuming the coroutine.
    #[error("script runtime error: {source}")]
    ScriptRuntime {
        #[from]
        source: mlua::Error,
    },

    /// An accessor was invoked while the coroutine was not in the `Running`
    /// state, or the coroutine yielded through something other than the
    /// accessors this filter wires up.
    #[error("script contract violation: {reason}")]
    ContractViolation { reason: &'static str },

    /// A script-visible wrapper was used after its underlying data was
    /// invalidated.
    #[error("dead wrapper access: {entity}")]
    DeadWrapper { entity: &'static str },
}

impl FilterError {
    pub(crate) fn dead_wrapper(entity: &'static str) -> mlua::Error {
        mlua::Error::external(FilterError::DeadWrapper { entity })
    }

    pub(crate) fn contract_violation(reason: &'static str) -> mlua::Error {
        mlua::Error::external(FilterError::ContractViolation { reason })
    }
}
