//! Ordered route table.
//!
//! Routes are tried in registration order and the first full match wins:
//! the method must be accepted, the compiled pattern must match the whole
//! path, and every typed placeholder must convert. A conversion failure only
//! rejects that one route, so a later, looser route can still answer.

use crate::converters::{Converter, ConverterRegistry, ParamValue};
use crate::error::RouterError;
use crate::pattern::{MAX_PATTERN_LENGTH, PathPattern};
use crate::route::Route;
use async_trait::async_trait;
use hyper::Method;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use trellis_core::exception::{Error, Result};
use trellis_http::{Handler, Request, Response};

/// Result of a successful match.
#[derive(Clone)]
pub struct RouteMatch {
	pub handler: Arc<dyn Handler>,
	/// Full name (`namespace:name`) of the matched route, if it has one.
	pub name: Option<String>,
	/// Source text of the matched pattern.
	pub pattern: String,
	pub params: IndexMap<String, ParamValue>,
}

impl RouteMatch {
	pub fn param(&self, name: &str) -> Option<&ParamValue> {
		self.params.get(name)
	}
}

impl fmt::Debug for RouteMatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteMatch")
			.field("name", &self.name)
			.field("pattern", &self.pattern)
			.field("params", &self.params)
			.finish_non_exhaustive()
	}
}

#[derive(Clone)]
struct RouteEntry {
	route: Route,
	pattern: PathPattern,
}

/// Maps `(method, path)` to a handler.
///
/// Built once at startup and shared read-only (typically as `Arc<Router>`).
///
/// # Examples
///
/// ```
/// use trellis_urls::{Router, ParamValue};
/// use trellis_http::{handler_fn, Response};
/// use hyper::Method;
///
/// let mut router = Router::new();
/// router
///     .register("/items/{id:int}", [Method::GET], handler_fn(|_req| async { Ok(Response::ok()) }))
///     .unwrap();
///
/// let matched = router.match_route(&Method::GET, "/items/42").unwrap();
/// assert_eq!(matched.params["id"], ParamValue::Int(42));
///
/// assert!(router.match_route(&Method::GET, "/items/abc").is_none());
/// ```
#[derive(Clone)]
pub struct Router {
	converters: ConverterRegistry,
	routes: Vec<RouteEntry>,
	names: HashMap<String, usize>,
	max_pattern_length: usize,
}

impl Router {
	pub fn new() -> Self {
		Self {
			converters: ConverterRegistry::new(),
			routes: Vec::new(),
			names: HashMap::new(),
			max_pattern_length: MAX_PATTERN_LENGTH,
		}
	}

	/// Set the maximum accepted pattern length for routes registered afterwards.
	pub fn with_max_pattern_length(mut self, max: usize) -> Self {
		self.max_pattern_length = max;
		self
	}

	/// Make a custom placeholder type available to later registrations.
	pub fn register_converter(&mut self, name: impl Into<String>, converter: Arc<dyn Converter>) {
		self.converters.register(name, converter);
	}

	/// Register `handler` for `pattern` and `methods`.
	///
	/// # Errors
	///
	/// - [`RouterError::Conflict`] if the same pattern is already bound for one
	///   of the methods
	/// - [`RouterError::InvalidPattern`] if the pattern does not compile
	/// - [`RouterError::EmptyMethodSet`] if `methods` is empty
	pub fn register(
		&mut self,
		pattern: &str,
		methods: impl IntoIterator<Item = Method>,
		handler: Arc<dyn Handler>,
	) -> std::result::Result<(), RouterError> {
		self.add_route(Route::new(pattern, methods, handler))
	}

	/// Register a fully described route.
	pub fn add_route(&mut self, route: Route) -> std::result::Result<(), RouterError> {
		let pattern =
			PathPattern::with_limit(&route.path, &self.converters, self.max_pattern_length)?;
		self.push(route, pattern)
	}

	fn push(&mut self, route: Route, pattern: PathPattern) -> std::result::Result<(), RouterError> {
		if route.methods.is_empty() {
			return Err(RouterError::EmptyMethodSet(route.path));
		}

		for existing in &self.routes {
			if existing.pattern.pattern() != pattern.pattern() {
				continue;
			}
			if let Some(method) = route.methods.iter().find(|m| existing.route.accepts(m)) {
				return Err(RouterError::Conflict {
					pattern: pattern.pattern().to_string(),
					method: method.to_string(),
				});
			}
		}

		tracing::debug!(
			pattern = %pattern,
			methods = ?route.methods,
			name = ?route.full_name(),
			"registered route"
		);

		if let Some(full_name) = route.full_name() {
			// First registration keeps the name
			self.names.entry(full_name).or_insert(self.routes.len());
		}
		self.routes.push(RouteEntry { route, pattern });
		Ok(())
	}

	/// Mount every route of `other` under `prefix`, keeping its order.
	///
	/// Routes of `other` are appended after the routes already registered here
	/// and go through the same conflict detection. Converters registered on
	/// `other` stay available to its routes.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_urls::{ParamValue, Router};
	/// use trellis_http::{handler_fn, Response};
	/// use hyper::Method;
	///
	/// let handler = handler_fn(|_req| async { Ok(Response::ok()) });
	/// let mut users = Router::new();
	/// users.add_route(
	///     trellis_urls::Route::new("/{id:int}/", [Method::GET], handler).with_name("detail"),
	/// ).unwrap();
	///
	/// let mut root = Router::new();
	/// root.include("/users", &users, Some("users")).unwrap();
	///
	/// assert!(root.match_route(&Method::GET, "/users/7/").is_some());
	/// assert_eq!(root.reverse("users:detail", &[("id", ParamValue::Int(7))]).unwrap(), "/users/7/");
	/// ```
	pub fn include(
		&mut self,
		prefix: &str,
		other: &Router,
		namespace: Option<&str>,
	) -> std::result::Result<(), RouterError> {
		let mut converters = self.converters.clone();
		converters.extend_missing(&other.converters);

		for entry in &other.routes {
			let route = entry.route.mounted(prefix, namespace);
			let pattern =
				PathPattern::with_limit(&route.path, &converters, self.max_pattern_length)?;
			self.push(route, pattern)?;
		}
		Ok(())
	}

	pub fn routes(&self) -> impl Iterator<Item = &Route> {
		self.routes.iter().map(|entry| &entry.route)
	}

	pub fn len(&self) -> usize {
		self.routes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Find the first route accepting `method` whose pattern fully matches
	/// `path`. A non-match is `None`, never an error.
	pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
		for entry in &self.routes {
			if !entry.route.accepts(method) {
				continue;
			}
			if let Some(params) = entry.pattern.matches(path) {
				tracing::trace!(%method, path, pattern = %entry.pattern, "route matched");
				return Some(RouteMatch {
					handler: entry.route.handler(),
					name: entry.route.full_name(),
					pattern: entry.pattern.pattern().to_string(),
					params,
				});
			}
		}
		tracing::trace!(%method, path, "no route matched");
		None
	}

	/// Methods of all routes whose pattern matches `path`, in registration
	/// order.
	pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
		let mut allowed: Vec<Method> = Vec::new();
		for entry in &self.routes {
			if entry.pattern.matches(path).is_none() {
				continue;
			}
			for method in &entry.route.methods {
				if !allowed.contains(method) {
					allowed.push(method.clone());
				}
			}
		}
		allowed
	}

	/// Route a request to its handler.
	///
	/// Matched parameters are stored in `request.path_params` in their URL
	/// form.
	///
	/// # Errors
	///
	/// [`Error::NotFound`] when no pattern matches the path,
	/// [`Error::MethodNotAllowed`] when patterns match but none for this
	/// method, or whatever the handler returns.
	pub async fn dispatch(&self, mut request: Request) -> Result<Response> {
		let path = request.path().to_string();

		let Some(matched) = self.match_route(&request.method, &path) else {
			let allowed = self.allowed_methods(&path);
			if allowed.is_empty() {
				return Err(Error::NotFound(format!("No route found for {}", path)));
			}
			return Err(Error::MethodNotAllowed {
				method: request.method.to_string(),
				path,
				allowed: allowed.iter().map(ToString::to_string).collect(),
			});
		};

		request.path_params = matched
			.params
			.iter()
			.map(|(name, value)| (name.clone(), value.to_string()))
			.collect();
		matched.handler.handle(request).await
	}

	/// Build the path of the route named `name`.
	///
	/// # Errors
	///
	/// - [`RouterError::NoReverseMatch`] if no route has that name
	/// - [`RouterError::MissingParameter`] if a placeholder has no value
	/// - [`RouterError::InvalidParameter`] if a converter refuses a value
	pub fn reverse(
		&self,
		name: &str,
		params: &[(&str, ParamValue)],
	) -> std::result::Result<String, RouterError> {
		let entry = self
			.names
			.get(name)
			.and_then(|index| self.routes.get(*index))
			.ok_or_else(|| RouterError::NoReverseMatch(name.to_string()))?;

		let params: HashMap<String, ParamValue> = params
			.iter()
			.map(|(key, value)| (key.to_string(), value.clone()))
			.collect();

		entry.pattern.reverse(&params).map_err(|err| match err {
			RouterError::MissingParameter { param, .. } => RouterError::MissingParameter {
				route: name.to_string(),
				param,
			},
			other => other,
		})
	}

	/// [`Router::reverse`] with plain string values.
	pub fn reverse_with<K: AsRef<str>, V: AsRef<str>>(
		&self,
		name: &str,
		params: &[(K, V)],
	) -> std::result::Result<String, RouterError> {
		let params: Vec<(&str, ParamValue)> = params
			.iter()
			.map(|(key, value)| (key.as_ref(), ParamValue::from(value.as_ref())))
			.collect();
		self.reverse(name, &params)
	}
}

impl Default for Router {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field("routes", &self.routes().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl Handler for Router {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.dispatch(request).await
	}
}
