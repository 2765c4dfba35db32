use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use trellis_core::exception::{Error, Result};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP request as seen by routers and handlers.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Path parameters extracted by the router, in their URL form.
	pub path_params: HashMap<String, String>,
	pub query_params: HashMap<String, String>,
}

impl Request {
	/// Start building a request.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/api/users?page=2")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/api/users");
	/// assert_eq!(request.query_params.get("page"), Some(&"2".to_string()));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	/// Decoded form pairs from the query string followed by an urlencoded body.
	///
	/// Pairs keep their submission order and repeated keys are preserved.
	///
	/// # Errors
	///
	/// Returns [`Error::Http`] if the body claims to be urlencoded but cannot be
	/// decoded.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/submit?source=web")
	///     .header("content-type", "application/x-www-form-urlencoded")
	///     .body("tag=a&tag=b")
	///     .build()
	///     .unwrap();
	///
	/// let pairs = request.form_pairs().unwrap();
	/// assert_eq!(pairs, vec![
	///     ("source".to_string(), "web".to_string()),
	///     ("tag".to_string(), "a".to_string()),
	///     ("tag".to_string(), "b".to_string()),
	/// ]);
	/// ```
	pub fn form_pairs(&self) -> Result<Vec<(String, String)>> {
		let mut pairs: Vec<(String, String)> = match self.uri.query() {
			Some(query) => serde_urlencoded::from_str(query)
				.map_err(|e| Error::Http(format!("Malformed query string: {}", e)))?,
			None => Vec::new(),
		};

		if self.is_form_encoded() && !self.body.is_empty() {
			let body: Vec<(String, String)> = serde_urlencoded::from_bytes(&self.body)
				.map_err(|e| Error::Http(format!("Malformed form body: {}", e)))?;
			pairs.extend(body);
		}

		Ok(pairs)
	}

	fn is_form_encoded(&self) -> bool {
		self.headers
			.get(hyper::header::CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.map(|v| v.starts_with(FORM_CONTENT_TYPE))
			.unwrap_or(false)
	}

	fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter(|pair| !pair.is_empty())
					.filter_map(|pair| {
						// Split on first '=' only to preserve '=' in values
						let mut parts = pair.splitn(2, '=');
						let key = parts.next()?;
						let value = parts.next().unwrap_or("");
						Some((
							percent_decode_str(key).decode_utf8_lossy().to_string(),
							percent_decode_str(value).decode_utf8_lossy().to_string(),
						))
					})
					.collect()
			})
			.unwrap_or_default()
	}
}

/// Builder for [`Request`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	headers: HeaderMap,
	body: Bytes,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	/// Adds a header; invalid names or values are ignored.
	pub fn header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = hyper::header::HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = hyper::header::HeaderValue::from_str(value)
		{
			self.headers.append(header_name, header_value);
		}
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Finish the request. The method defaults to `GET` and the URI to `/`.
	///
	/// # Errors
	///
	/// Returns [`Error::Http`] if the URI cannot be parsed.
	pub fn build(self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.as_deref()
			.unwrap_or("/")
			.parse()
			.map_err(|e| Error::Http(format!("Invalid URI: {}", e)))?;
		let query_params = Request::parse_query_params(&uri);

		Ok(Request {
			method: self.method.unwrap_or(Method::GET),
			uri,
			headers: self.headers,
			body: self.body,
			path_params: HashMap::new(),
			query_params,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_builder_defaults() {
		let request = Request::builder().build().unwrap();

		assert_eq!(request.method, Method::GET);
		assert_eq!(request.path(), "/");
		assert!(request.path_params.is_empty());
	}

	#[rstest]
	fn test_query_params_are_decoded() {
		let request = Request::builder()
			.uri("/search?name=John%20Doe&empty")
			.build()
			.unwrap();

		assert_eq!(
			request.query_params.get("name"),
			Some(&"John Doe".to_string())
		);
		assert_eq!(request.query_params.get("empty"), Some(&String::new()));
	}

	#[rstest]
	fn test_invalid_uri_is_rejected() {
		let result = Request::builder().uri("http://[::1").build();

		assert!(matches!(result, Err(Error::Http(_))));
	}

	#[rstest]
	fn test_form_pairs_ignore_body_without_content_type() {
		// Arrange
		let request = Request::builder()
			.method(Method::POST)
			.uri("/submit")
			.body("name=ignored")
			.build()
			.unwrap();

		// Act
		let pairs = request.form_pairs().unwrap();

		// Assert
		assert!(pairs.is_empty());
	}

	#[rstest]
	fn test_form_pairs_decode_plus_as_space() {
		let request = Request::builder()
			.method(Method::POST)
			.header("content-type", "application/x-www-form-urlencoded; charset=utf-8")
			.body("title=hello+world")
			.build()
			.unwrap();

		let pairs = request.form_pairs().unwrap();

		assert_eq!(pairs, vec![("title".to_string(), "hello world".to_string())]);
	}
}
