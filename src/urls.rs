//! URL routing module.
//!
//! # Examples
//!
//! ```
//! use trellis::urls::{ParamValue, Router};
//! use trellis::http::{Request, Response, handler_fn};
//! use hyper::Method;
//!
//! let mut router = Router::new();
//! router
//!     .register("/posts/{year:int}/{slug:slug}/", [Method::GET], handler_fn(|_req: Request| async { Ok(Response::ok()) }))
//!     .unwrap();
//!
//! let matched = router.match_route(&Method::GET, "/posts/2024/hello-world/").unwrap();
//! assert_eq!(matched.param("year"), Some(&ParamValue::Int(2024)));
//! ```

pub use trellis_urls::*;
