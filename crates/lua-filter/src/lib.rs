//! A streaming HTTP request filter that hands each request to a
//! user-supplied Lua script and mediates the script's coroutine against the
//! request's header/body/trailer stream as those pieces arrive from the
//! network.
//!
//! This crate implements only the decode-side bridge. The HTTP decoder, the
//! connection manager, header-container semantics, and the request buffer
//! are all external collaborators (`micro_http` plays that role in this
//! workspace and in the crate's own tests). This crate only consumes their
//! interfaces, through [`PipelineCallbacks`].
//!
//! # Example
//!
//! ```no_run
//! use http_lua_filter::{FilterConfig, FilterAdapter, ScriptContext, BufferedBody};
//! use http::HeaderMap;
//!
//! let config = FilterConfig::new(r#"
//!     function envoy_on_request(handle)
//!         handle:log(0, handle:headers():get(":path"))
//!     end
//! "#);
//! let ctx = ScriptContext::new(&config).expect("script compiles");
//!
//! let mut filter = FilterAdapter::new();
//! filter.decode_headers(&ctx, HeaderMap::new(), true, BufferedBody::new());
//! ```

mod config;
mod error;
mod filter_adapter;
mod pipeline;
mod session;
mod stream_handle;
mod wrappers;

pub use config::FilterConfig;
pub use error::{ConfigError, FilterError};
pub use filter_adapter::FilterAdapter;
pub use pipeline::{BufferedBody, PipelineCallbacks};
pub use session::{FilterStatus, RequestSession};

mod script_context;
pub use script_context::ScriptContext;
