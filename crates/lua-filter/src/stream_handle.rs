//! The native probes behind the script-facing `handle:*` accessors (§4.1,
//! §6).
//!
//! [`StreamHandleNative`] is the `mlua::UserData` the prelude (`prelude.lua`)
//! wraps with a blocking loop. Every method here is synchronous and never
//! yields; yielding is entirely the prelude's `coroutine.yield()`, driven
//! by the `ready` flag these probes return. This split is what lets the
//! suspend/resume state machine live in ordinary, testable Rust instead of
//! inside a Lua/C yield boundary.

use mlua::{Lua, UserData, UserDataMethods};

use crate::error::FilterError;
use crate::session::{SessionInner, SharedInner, State};
use crate::wrappers::{Cell, new_buffer_wrapper, new_header_wrapper};

#[derive(Clone)]
pub(crate) struct StreamHandleNative {
    pub(crate) inner: SharedInner,
}

fn require_running(inner: &SessionInner, reason: &'static str) -> mlua::Result<()> {
    if inner.state == State::Running { Ok(()) } else { Err(FilterError::contract_violation(reason)) }
}

impl UserData for StreamHandleNative {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("headers", |lua, this, ()| {
            let mut inner = this.inner.borrow_mut();
            require_running(&inner, "handle:headers() called while not running")?;

            if let Some(existing) = inner.headers_wrapper.clone() {
                return Ok(existing);
            }

            let wrapper = new_header_wrapper(lua, inner.headers_cell.clone())?;
            inner.headers_wrapper = Some(wrapper.clone());
            Ok(wrapper)
        });

        methods.add_method("log", |_, this, (level, message): (i64, String)| {
            let inner = this.inner.borrow();
            inner.callbacks.borrow().script_log(level, &message);
            tracing::debug!(target: "lua_script", level, %message, "script log");
            Ok(())
        });

        // Probes: synchronous, return (ready, value). Never yield.
        methods.add_method("poll_body", |lua, this, ()| poll_body(lua, this));
        methods.add_method("poll_next_chunk", |lua, this, ()| poll_next_chunk(lua, this));
        methods.add_method("poll_trailers", |lua, this, ()| poll_trailers(lua, this));
    }
}

fn poll_body(lua: &Lua, this: &StreamHandleNative) -> mlua::Result<(bool, Option<mlua::AnyUserData>)> {
    let mut inner = this.inner.borrow_mut();
    require_running(&inner, "handle:body() probed while not running")?;

    if !inner.end_stream {
        inner.state = State::WaitForBody;
        return Ok((false, None));
    }

    if let Some(existing) = inner.body_wrapper.clone() {
        return Ok((true, Some(existing)));
    }

    let body = inner.callbacks.borrow().buffered_body();
    match body {
        None => Ok((true, None)),
        Some(bytes) => {
            let cell = Cell::alive(bytes);
            let wrapper = new_buffer_wrapper(lua, cell.clone())?;
            inner.body_cell = Some(cell);
            inner.body_wrapper = Some(wrapper.clone());
            Ok((true, Some(wrapper)))
        }
    }
}

fn poll_next_chunk(lua: &Lua, this: &StreamHandleNative) -> mlua::Result<(bool, Option<mlua::AnyUserData>)> {
    let mut inner = this.inner.borrow_mut();
    require_running(&inner, "bodyChunks() iterator probed while not running")?;

    if let Some(bytes) = inner.pending_chunk.take() {
        let cell = Cell::alive(bytes);
        inner.chunk_cell = Some(cell.clone());
        let wrapper = new_buffer_wrapper(lua, cell)?;
        return Ok((true, Some(wrapper)));
    }

    if inner.end_stream {
        return Ok((true, None));
    }

    inner.state = State::WaitForBodyChunk;
    Ok((false, None))
}

fn poll_trailers(lua: &Lua, this: &StreamHandleNative) -> mlua::Result<(bool, Option<mlua::AnyUserData>)> {
    let mut inner = this.inner.borrow_mut();
    require_running(&inner, "handle:trailers() probed while not running")?;

    match inner.trailers.clone() {
        Some(Some(map)) => {
            if let Some(existing) = inner.trailers_wrapper.clone() {
                return Ok((true, Some(existing)));
            }
            let cell = Cell::alive(map);
            let wrapper = new_header_wrapper(lua, cell.clone())?;
            inner.trailers_cell = Some(cell);
            inner.trailers_wrapper = Some(wrapper.clone());
            Ok((true, Some(wrapper)))
        }
        Some(None) => Ok((true, None)),
        None if inner.end_stream => {
            inner.trailers = Some(None);
            Ok((true, None))
        }
        None => {
            inner.state = State::WaitForTrailers;
            Ok((false, None))
        }
    }
}
