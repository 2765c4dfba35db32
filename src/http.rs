//! HTTP module.
//!
//! Requests, responses and the handler trait.
//!
//! # Examples
//!
//! ```
//! use trellis::http::{Request, Response, handler_fn};
//!
//! let hello = handler_fn(|_req: Request| async { Ok(Response::ok().with_body("hello")) });
//! # let _ = hello;
//! ```

pub use trellis_http::*;
