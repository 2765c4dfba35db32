//! HTTP primitives used by the Trellis router and application facade.
//!
//! - [`Request`]: method, URI, headers, body and the path parameters filled
//!   in by the router
//! - [`Response`]: status, headers and body
//! - [`Handler`]: the async trait every routed endpoint implements

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{FnHandler, Handler, handler_fn};
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export error types so handlers need a single import
pub use trellis_core::exception::{Error, Result};
