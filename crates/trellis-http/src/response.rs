use bytes::Bytes;
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

/// HTTP response representation
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use trellis_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	pub fn bad_request() -> Self {
		Self::new(StatusCode::BAD_REQUEST)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// `303 See Other` pointing at `location`, the usual answer to a valid form
	/// submission.
	pub fn see_other(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::SEE_OTHER).with_location(location.as_ref())
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a custom header to the response; invalid names or values are ignored.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_http::Response;
	///
	/// let response = Response::ok().with_header("X-Custom-Header", "custom-value");
	/// assert_eq!(
	///     response.headers.get("X-Custom-Header").unwrap().to_str().unwrap(),
	///     "custom-value"
	/// );
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = hyper::header::HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = hyper::header::HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}

	pub fn with_location(mut self, location: &str) -> Self {
		if let Ok(value) = hyper::header::HeaderValue::from_str(location) {
			self.headers.insert(hyper::header::LOCATION, value);
		}
		self
	}

	/// Set an HTML body with the matching content type.
	pub fn with_html(self, html: impl Into<String>) -> Self {
		self.with_header("content-type", "text/html; charset=utf-8")
			.with_body(html.into())
	}

	/// Set the response body to JSON and add the Content-Type header.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!({"ok": true})).unwrap();
	/// assert_eq!(
	///     response.headers.get("content-type").unwrap().to_str().unwrap(),
	///     "application/json"
	/// );
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> crate::Result<Self> {
		let body = serde_json::to_vec(data)
			.map_err(|e| crate::Error::Internal(format!("JSON serialization failed: {}", e)))?;
		self.headers.insert(
			hyper::header::CONTENT_TYPE,
			hyper::header::HeaderValue::from_static("application/json"),
		);
		self.body = Bytes::from(body);
		Ok(self)
	}

	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).to_string()
	}
}

impl From<crate::Error> for Response {
	fn from(error: crate::Error) -> Self {
		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let body = serde_json::json!({
			"error": error.to_string(),
		});

		let mut response = Response::new(status)
			.with_json(&body)
			.unwrap_or_else(|_| Response::internal_server_error());

		if let crate::Error::MethodNotAllowed { allowed, .. } = &error {
			response = response.with_header("allow", &allowed.join(", "));
		}
		response
	}
}
