//! Script-visible wrapper objects (§4.2).
//!
//! A wrapper mediates between the Lua heap and a native entity (a header
//! map or a byte buffer) that is only valid for part of the request's
//! lifetime. Because this revision never mutates headers or bodies from the
//! script, a wrapper does not need to alias the pipeline's storage: it holds
//! its own clone of the data behind a [`Cell`], and that cell's `None` state
//! *is* the liveness flag described in §3. It is cleared no later than the
//! moment the underlying native entity becomes invalid, after which every
//! operation on the wrapper fails with a script-level error.

use std::cell::RefCell;
use std::rc::Rc;

use bytes::Bytes;
use http::HeaderMap;
use mlua::{Lua, UserData, UserDataMethods};

use crate::error::FilterError;

/// A shared, killable slot holding a borrowed-in-spirit native value.
///
/// Cloning a [`Cell`] clones the `Rc`, not the data: the session and every
/// wrapper built from the same cell observe the same liveness transition.
#[derive(Debug, Clone)]
pub(crate) struct Cell<T>(Rc<RefCell<Option<T>>>);

impl<T: Clone> Cell<T> {
    pub(crate) fn alive(value: T) -> Self {
        Self(Rc::new(RefCell::new(Some(value))))
    }

    /// Marks the cell dead. Idempotent.
    pub(crate) fn kill(&self) {
        *self.0.borrow_mut() = None;
    }

    fn get(&self, entity: &'static str) -> mlua::Result<T> {
        self.0.borrow().clone().ok_or_else(|| FilterError::dead_wrapper(entity))
    }
}

/// Wraps a header map (request headers or trailers) borrowed from the
/// pipeline.
#[derive(Debug, Clone)]
pub(crate) struct HeaderMapWrapper {
    cell: Cell<HeaderMap>,
}

impl HeaderMapWrapper {
    pub(crate) fn new(cell: Cell<HeaderMap>) -> Self {
        Self { cell }
    }
}

impl UserData for HeaderMapWrapper {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("get", |_, this, key: String| {
            let headers = this.cell.get("header map")?;
            Ok(headers.get(key.as_str()).and_then(|v| v.to_str().ok()).map(str::to_owned))
        });

        methods.add_method("iterate", |lua, this, callback: mlua::Function| {
            let headers = this.cell.get("header map")?;
            for (name, value) in &headers {
                let Ok(value) = value.to_str() else { continue };
                callback.call::<()>((name.as_str(), value))?;
            }
            let _ = lua;
            Ok(())
        });

        // `add`/`remove` are accepted but are no-ops in this revision (§1, §4.2):
        // mutating headers after decode-headers has returned `Continue` would be
        // unsound, so this revision sidesteps the question entirely rather than
        // reject the call.
        methods.add_method("add", |_, this, (_key, _value): (String, String)| {
            this.cell.get("header map")?;
            Ok(())
        });

        methods.add_method("remove", |_, this, _key: String| {
            this.cell.get("header map")?;
            Ok(())
        });
    }
}

/// Wraps a byte buffer: either a transient decode chunk (valid only for the
/// resume that produced it) or the pipeline's accumulated body (valid until
/// decode completes).
#[derive(Debug, Clone)]
pub(crate) struct BufferWrapper {
    cell: Cell<Bytes>,
}

impl BufferWrapper {
    pub(crate) fn new(cell: Cell<Bytes>) -> Self {
        Self { cell }
    }
}

impl UserData for BufferWrapper {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("byteSize", |_, this, ()| {
            let bytes = this.cell.get("buffer")?;
            Ok(bytes.len())
        });
    }
}

pub(crate) fn new_header_wrapper(lua: &Lua, cell: Cell<HeaderMap>) -> mlua::Result<mlua::AnyUserData> {
    lua.create_userdata(HeaderMapWrapper::new(cell))
}

pub(crate) fn new_buffer_wrapper(lua: &Lua, cell: Cell<Bytes>) -> mlua::Result<mlua::AnyUserData> {
    lua.create_userdata(BufferWrapper::new(cell))
}
