use hyper::Method;
use std::fmt;
use std::sync::Arc;
use trellis_http::Handler;

/// Route definition: a path pattern, the methods it answers and its handler.
///
/// The pattern is kept as source text here and compiled by the router it is
/// registered with, so custom converters registered on that router apply.
#[derive(Clone)]
pub struct Route {
	pub path: String,
	pub methods: Vec<Method>,
	handler: Arc<dyn Handler>,
	pub name: Option<String>,
	/// Namespace for this route (e.g., "users", "api").
	/// Combined with the name as "namespace:name".
	pub namespace: Option<String>,
}

impl Route {
	/// Create a new route
	///
	/// # Examples
	///
	/// ```
	/// use trellis_urls::Route;
	/// use trellis_http::{handler_fn, Response};
	/// use hyper::Method;
	///
	/// let handler = handler_fn(|_req| async { Ok(Response::ok()) });
	/// let route = Route::new("/users/", [Method::GET], handler).with_name("user-list");
	/// assert_eq!(route.path, "/users/");
	/// assert_eq!(route.full_name(), Some("user-list".to_string()));
	/// ```
	pub fn new(
		path: impl Into<String>,
		methods: impl IntoIterator<Item = Method>,
		handler: Arc<dyn Handler>,
	) -> Self {
		let mut unique: Vec<Method> = Vec::new();
		for method in methods {
			if !unique.contains(&method) {
				unique.push(method);
			}
		}
		Self {
			path: path.into(),
			methods: unique,
			handler,
			name: None,
			namespace: None,
		}
	}

	/// Create a route from a concrete handler without wrapping it in `Arc`.
	pub fn from_handler<H>(
		path: impl Into<String>,
		methods: impl IntoIterator<Item = Method>,
		handler: H,
	) -> Self
	where
		H: Handler + 'static,
	{
		Self::new(path, methods, Arc::new(handler))
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}

	/// Name used for reversing: `namespace:name`, or just `name`.
	pub fn full_name(&self) -> Option<String> {
		match (&self.namespace, &self.name) {
			(Some(ns), Some(name)) => Some(format!("{}:{}", ns, name)),
			(None, Some(name)) => Some(name.clone()),
			_ => None,
		}
	}

	pub fn handler(&self) -> Arc<dyn Handler> {
		Arc::clone(&self.handler)
	}

	pub fn accepts(&self, method: &Method) -> bool {
		self.methods.contains(method)
	}

	/// Copy of this route mounted under `prefix`, with `namespace` prepended
	/// to its own.
	pub(crate) fn mounted(&self, prefix: &str, namespace: Option<&str>) -> Self {
		let mut route = self.clone();
		route.path = join_prefix(prefix, &self.path);
		route.namespace = match (namespace, &self.namespace) {
			(Some(outer), Some(inner)) => Some(format!("{}:{}", outer, inner)),
			(Some(outer), None) => Some(outer.to_string()),
			(None, inner) => inner.clone(),
		};
		route
	}
}

impl fmt::Debug for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("path", &self.path)
			.field("methods", &self.methods)
			.field("name", &self.name)
			.field("namespace", &self.namespace)
			.finish_non_exhaustive()
	}
}

fn join_prefix(prefix: &str, path: &str) -> String {
	match (prefix.ends_with('/'), path.starts_with('/')) {
		(true, true) => format!("{}{}", prefix, &path[1..]),
		(false, false) if !prefix.is_empty() && !path.is_empty() => format!("{}/{}", prefix, path),
		_ => format!("{}{}", prefix, path),
	}
}
