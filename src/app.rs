//! The application: a shared router plus settings.
//!
//! [`App::handle`] is the single entry point a server loop calls. Every
//! [`Error`] is turned into a response here, so handlers can return errors
//! freely with `?`.

use crate::http::{Error, Handler, Request, Response};
use crate::urls::{Route, Router, RouterError};
use hyper::Method;
use std::sync::Arc;
use trellis_conf::Settings;

#[cfg(feature = "forms")]
use trellis_forms::{Form, FormSchema};

/// A configured router ready to serve requests.
#[derive(Debug, Clone)]
pub struct App {
	router: Arc<Router>,
	settings: Arc<Settings>,
}

impl App {
	/// An app with default settings around an already built router.
	pub fn new(router: Router) -> Self {
		Self::with_settings(router, Settings::default())
	}

	pub fn with_settings(router: Router, settings: Settings) -> Self {
		Self {
			router: Arc::new(router),
			settings: Arc::new(settings),
		}
	}

	/// Start building an app whose router follows `settings`.
	///
	/// # Examples
	///
	/// ```
	/// use trellis::{App, Settings};
	/// use trellis::http::{Request, Response, handler_fn};
	/// use hyper::Method;
	///
	/// let app = App::builder(Settings::default())
	///     .route("/", [Method::GET], handler_fn(|_req: Request| async { Ok(Response::ok()) }))
	///     .unwrap()
	///     .build();
	///
	/// assert_eq!(app.router().len(), 1);
	/// ```
	pub fn builder(settings: Settings) -> AppBuilder {
		AppBuilder {
			router: Router::new().with_max_pattern_length(settings.router.max_pattern_length),
			settings,
		}
	}

	pub fn router(&self) -> &Arc<Router> {
		&self.router
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Install the logging subscriber described by the settings.
	pub fn init_logging(&self) {
		crate::logging::init(&self.settings.logging);
	}

	/// Route a request and always produce a response.
	///
	/// Unmatched paths give `404`, paths served only for other methods give
	/// `405` with an `allow` header, and handler errors map through
	/// [`Error::status_code`] with a JSON `{"error": ...}` body.
	pub async fn handle(&self, request: Request) -> Response {
		let method = request.method.clone();
		let path = request.path().to_string();

		match self.router.dispatch(request).await {
			Ok(response) => {
				tracing::debug!(%method, path, status = %response.status, "request handled");
				response
			}
			Err(err) => {
				if err.is_client_error() {
					tracing::debug!(%method, path, error = %err, "request rejected");
				} else {
					tracing::warn!(%method, path, error = %err, "request failed");
				}
				Response::from(err)
			}
		}
	}

	/// A fresh form for `schema` using the configured id prefix and null
	/// option label.
	#[cfg(feature = "forms")]
	pub fn form(&self, schema: Arc<FormSchema>) -> Form {
		Form::new(schema)
			.with_id_prefix(&self.settings.forms.id_prefix)
			.with_null_label(self.settings.forms.null_label.clone())
	}

	/// Path of the named route, see [`Router::reverse_with`].
	///
	/// # Errors
	///
	/// Any [`RouterError`] from reversing, as a configuration error.
	pub fn url_for<K: AsRef<str>, V: AsRef<str>>(
		&self,
		name: &str,
		params: &[(K, V)],
	) -> Result<String, Error> {
		Ok(self.router.reverse_with(name, params)?)
	}
}

/// Collects routes for an [`App`].
#[derive(Debug)]
pub struct AppBuilder {
	router: Router,
	settings: Settings,
}

impl AppBuilder {
	/// Register a handler, see [`Router::register`].
	///
	/// # Errors
	///
	/// Conflicting or malformed patterns.
	pub fn route(
		mut self,
		pattern: &str,
		methods: impl IntoIterator<Item = Method>,
		handler: Arc<dyn Handler>,
	) -> Result<Self, RouterError> {
		self.router.register(pattern, methods, handler)?;
		Ok(self)
	}

	/// Register a fully described route.
	///
	/// # Errors
	///
	/// Conflicting or malformed patterns.
	pub fn add_route(mut self, route: Route) -> Result<Self, RouterError> {
		self.router.add_route(route)?;
		Ok(self)
	}

	/// Mount another router's routes under `prefix`.
	///
	/// # Errors
	///
	/// Conflicts between mounted and existing routes.
	pub fn include(
		mut self,
		prefix: &str,
		other: &Router,
		namespace: Option<&str>,
	) -> Result<Self, RouterError> {
		self.router.include(prefix, other, namespace)?;
		Ok(self)
	}

	pub fn router_mut(&mut self) -> &mut Router {
		&mut self.router
	}

	pub fn build(self) -> App {
		tracing::debug!(routes = self.router.len(), "application built");
		App::with_settings(self.router, self.settings)
	}
}
