//! The stream handle's state machine (§4.1) and the per-request session
//! (§3) that drives it.
//!
//! [`RequestSession`] owns the coroutine and is the only thing allowed to
//! resume it (§8 invariant: "a coroutine is never resumed from outside the
//! filter adapter"). Its `decode_data`/`decode_trailers` methods implement
//! the transition table in `spec.md` §4.1 exactly, cross-checked against
//! `examples/original_source/source/common/http/filter/lua/lua_filter.cc`'s
//! `onData`/`onTrailers`.

use std::cell::RefCell;
use std::rc::Rc;

use bytes::Bytes;
use http::HeaderMap;
use mlua::{Function, Lua, Thread, ThreadStatus, Value};

use crate::error::FilterError;
use crate::pipeline::PipelineCallbacks;
use crate::stream_handle::StreamHandleNative;
use crate::wrappers::Cell;

/// One of the four states from §4.1. `Finished` is not listed here: it is
/// the coroutine's own terminal status, queried via [`Thread::status`]
/// rather than tracked redundantly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Running,
    WaitForBodyChunk,
    WaitForBody,
    WaitForTrailers,
}

/// The filter chain status a decode callback returns (§4.3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStatus {
    Continue,
    StopIterationAndBuffer,
}

pub(crate) type SharedInner = Rc<RefCell<SessionInner>>;

/// Everything the stream-handle probes (`stream_handle.rs`) and the
/// session's decode-event handlers both need to see and mutate. Shared
/// rather than duplicated, so there is exactly one place state lives.
pub(crate) struct SessionInner {
    pub(crate) state: State,
    pub(crate) end_stream: bool,

    pub(crate) headers_cell: Cell<HeaderMap>,
    pub(crate) headers_wrapper: Option<mlua::AnyUserData>,

    /// `None` = not yet arrived; `Some(None)` = arrived-absent (end of
    /// stream with no trailers ever sent); `Some(Some(map))` = arrived.
    pub(crate) trailers: Option<Option<HeaderMap>>,
    pub(crate) trailers_cell: Option<Cell<HeaderMap>>,
    pub(crate) trailers_wrapper: Option<mlua::AnyUserData>,

    pub(crate) body_cell: Option<Cell<Bytes>>,
    pub(crate) body_wrapper: Option<mlua::AnyUserData>,

    /// Set by `decode_data` right before resuming a `WaitForBodyChunk`
    /// wait; consumed by `poll_next_chunk`.
    pub(crate) pending_chunk: Option<Bytes>,
    /// The most recently vended chunk wrapper's cell. Killed as soon as the
    /// resume that produced it returns (§4.2: chunk wrappers are valid only
    /// for that resume's duration).
    pub(crate) chunk_cell: Option<Cell<Bytes>>,

    pub(crate) callbacks: Rc<RefCell<dyn PipelineCallbacks>>,
}

impl SessionInner {
    fn kill_all(&self) {
        self.headers_cell.kill();
        if let Some(cell) = &self.trailers_cell {
            cell.kill();
        }
        if let Some(cell) = &self.body_cell {
            cell.kill();
        }
        if let Some(cell) = &self.chunk_cell {
            cell.kill();
        }
    }
}

/// Drives one script coroutine through one request's decode-side lifecycle.
pub struct RequestSession {
    thread: Thread,
    inner: SharedInner,
    finished: bool,
}

impl RequestSession {
    pub(crate) fn start<P>(
        lua: &Lua,
        entry_point: &Function,
        make_handle: &Function,
        headers: HeaderMap,
        end_stream: bool,
        callbacks: P,
    ) -> Result<Self, FilterError>
    where
        P: PipelineCallbacks + 'static,
    {
        let inner = Rc::new(RefCell::new(SessionInner {
            state: State::Running,
            end_stream,
            headers_cell: Cell::alive(headers),
            headers_wrapper: None,
            trailers: None,
            trailers_cell: None,
            trailers_wrapper: None,
            body_cell: None,
            body_wrapper: None,
            pending_chunk: None,
            chunk_cell: None,
            callbacks: Rc::new(RefCell::new(callbacks)),
        }));

        let native = StreamHandleNative { inner: Rc::clone(&inner) };
        let native_ud = lua.create_userdata(native)?;
        let handle: Value = make_handle.call(native_ud)?;

        let thread = lua.create_thread(entry_point.clone())?;

        let mut session = Self { thread, inner, finished: false };
        session.resume(handle)?;
        Ok(session)
    }

    fn resume<A: mlua::IntoLuaMulti>(&mut self, args: A) -> Result<(), FilterError> {
        let result: mlua::Result<mlua::MultiValue> = self.thread.resume(args);
        match result {
            Ok(_) => {
                if !matches!(self.thread.status(), ThreadStatus::Resumable) {
                    self.finished = true;
                }
                Ok(())
            }
            Err(e) => {
                self.finished = true;
                Err(e.into())
            }
        }
    }

    /// Resumes with no arguments, then kills whatever chunk wrapper was
    /// vended during this resume. Its scope has ended regardless of
    /// whether the coroutine suspended again or finished.
    fn resume_and_kill_chunk(&mut self) -> Result<(), FilterError> {
        let result = self.resume(());
        if let Some(cell) = self.inner.borrow_mut().chunk_cell.take() {
            cell.kill();
        }
        result
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// §4.1's decoder-originated event table, "body chunk" column.
    pub fn decode_data(&mut self, data: Bytes, end_stream: bool) -> Result<FilterStatus, FilterError> {
        if self.finished {
            return Ok(FilterStatus::Continue);
        }

        self.inner.borrow_mut().end_stream = end_stream;
        let state = self.inner.borrow().state;

        match state {
            State::Running => Ok(FilterStatus::Continue),

            State::WaitForBodyChunk => {
                self.inner.borrow_mut().pending_chunk = Some(data);
                self.inner.borrow_mut().state = State::Running;
                self.resume_and_kill_chunk()?;
                Ok(FilterStatus::Continue)
            }

            State::WaitForBody if end_stream => {
                self.inner.borrow().callbacks.borrow_mut().add_data(data);
                self.inner.borrow_mut().state = State::Running;
                self.resume(())?;
                Ok(FilterStatus::Continue)
            }

            State::WaitForBody => {
                self.inner.borrow().callbacks.borrow_mut().add_data(data);
                Ok(FilterStatus::StopIterationAndBuffer)
            }

            State::WaitForTrailers if end_stream => {
                // No trailers are coming; resume with nil.
                self.inner.borrow_mut().state = State::Running;
                self.resume(())?;
                Ok(FilterStatus::Continue)
            }

            // Impossible per §4.1 (body accessors must have terminated before
            // trailers() is reachable), kept total rather than panicking.
            State::WaitForTrailers => Ok(FilterStatus::Continue),
        }
    }

    /// §4.1's decoder-originated event table, "trailers" column.
    pub fn decode_trailers(&mut self, trailers: HeaderMap) -> Result<FilterStatus, FilterError> {
        if self.finished {
            return Ok(FilterStatus::Continue);
        }

        {
            let mut inner = self.inner.borrow_mut();
            inner.end_stream = true;
            inner.trailers = Some(Some(trailers));
        }

        let state = self.inner.borrow().state;
        match state {
            State::WaitForBodyChunk => {
                self.inner.borrow_mut().state = State::Running;
                self.resume_and_kill_chunk()?;
            }
            State::WaitForBody => {
                self.inner.borrow_mut().state = State::Running;
                self.resume(())?;
            }
            State::Running | State::WaitForTrailers => {}
        }

        if self.finished {
            return Ok(FilterStatus::Continue);
        }

        if self.inner.borrow().state == State::WaitForTrailers {
            self.inner.borrow_mut().state = State::Running;
            self.resume(())?;
        }

        Ok(FilterStatus::Continue)
    }
}

impl Drop for RequestSession {
    fn drop(&mut self) {
        self.inner.borrow().kill_all();
    }
}

impl std::fmt::Debug for RequestSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSession").field("finished", &self.finished).finish_non_exhaustive()
    }
}
