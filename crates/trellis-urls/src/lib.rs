//! URL routing for Trellis.
//!
//! A [`Router`] holds an ordered list of routes. Each route pairs a
//! [`PathPattern`] such as `/items/{id:int}/` with a set of HTTP methods and a
//! [`Handler`](trellis_http::Handler). Matching walks the routes in
//! registration order and returns the first one whose method set, pattern and
//! placeholder conversions all succeed.
//!
//! ## Quick Start
//!
//! ```
//! use trellis_urls::{Route, Router};
//! use trellis_http::{handler_fn, Request, Response};
//! use hyper::Method;
//!
//! let detail = handler_fn(|req: Request| async move {
//!     let id = req.path_param("id").unwrap_or_default().to_string();
//!     Ok(Response::ok().with_body(id))
//! });
//!
//! let mut router = Router::new();
//! router
//!     .add_route(Route::new("/items/{id:int}/", [Method::GET], detail).with_name("item-detail"))
//!     .unwrap();
//!
//! assert!(router.match_route(&Method::GET, "/items/42/").is_some());
//! assert!(router.match_route(&Method::GET, "/items/abc/").is_none());
//! assert_eq!(router.reverse_with("item-detail", &[("id", "42")]).unwrap(), "/items/42/");
//! ```
//!
//! ## Placeholder types
//!
//! `str` (default), `int`, `slug`, `uuid` and `path` are built in; others can
//! be added with [`Router::register_converter`].

pub mod converters;
pub mod error;
pub mod pattern;
pub mod route;
pub mod router;

pub use converters::{
	Converter, ConverterError, ConverterRegistry, ConverterResult, IntConverter, ParamValue,
	PathConverter, SlugConverter, StrConverter, UuidConverter,
};
pub use error::RouterError;
pub use pattern::{MAX_PATTERN_LENGTH, PathPattern, Placeholder};
pub use route::Route;
pub use router::{RouteMatch, Router};
