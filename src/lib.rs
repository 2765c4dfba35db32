//! # Trellis
//!
//! A small web toolkit built from two independent parts:
//!
//! - **Router** ([`urls`]): an ordered list of route patterns with typed
//!   placeholders (`/items/{id:int}/`). The first registered route whose
//!   method, pattern and placeholder conversions all succeed handles the
//!   request.
//! - **Form engine** ([`forms`], feature `forms`): a tree of fields, each
//!   pairing a converter with a widget. Validation reports every error at
//!   once and the form re-renders with what the user typed.
//!
//! [`App`] ties a router to [`Settings`] and turns errors into responses.
//!
//! ## Quick Example
//!
//! ```
//! use trellis::prelude::*;
//! use trellis::testing::ask;
//! use hyper::{Method, StatusCode};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let detail = handler_fn(|req: Request| async move {
//!     let id = req.path_param("id").unwrap_or_default().to_string();
//!     Ok(Response::ok().with_body(id))
//! });
//!
//! let app = App::builder(Settings::default())
//!     .add_route(Route::new("/items/{id:int}/", [Method::GET], detail).with_name("item"))
//!     .unwrap()
//!     .build();
//!
//! let response = ask(&app, Method::GET, "/items/42/", &[]).await;
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(response.text(), "42");
//!
//! let response = ask(&app, Method::GET, "/items/abc/", &[]).await;
//! assert_eq!(response.status, StatusCode::NOT_FOUND);
//!
//! assert_eq!(app.url_for("item", &[("id", "7")]).unwrap(), "/items/7/");
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `forms` (default): the form engine and [`App::form`]

pub mod app;
pub mod conf;
#[cfg(feature = "forms")]
pub mod forms;
pub mod http;
pub mod logging;
pub mod testing;
pub mod urls;

pub use app::{App, AppBuilder};
pub use trellis_conf::{Settings, SettingsBuilder};
pub use trellis_core::exception::{Error, Result};
pub use trellis_http::{Handler, Request, Response, handler_fn};
pub use trellis_urls::{ParamValue, Route, RouteMatch, Router, RouterError};

#[cfg(feature = "forms")]
pub use trellis_forms::{Field, Form, FormErrors, FormSchema, MultiDict, Value};

/// Re-exports for building an application.
pub mod prelude {
	pub use crate::{
		App, Error, Handler, ParamValue, Request, Response, Result, Route, Router, Settings,
		handler_fn,
	};

	#[cfg(feature = "forms")]
	pub use crate::{Field, Form, FormSchema, MultiDict, Value};

	// External
	pub use async_trait::async_trait;
}
