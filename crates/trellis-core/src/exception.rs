//! Framework-wide error type.
//!
//! Handlers return [`Result`]; the application facade turns an [`Error`] into
//! an HTTP response using [`Error::status_code`].

/// Errors raised while handling a request or configuring the application.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// No route matched the request path.
	#[error("Not found: {0}")]
	NotFound(String),

	/// The path matched, but not for the request method.
	#[error("Method not allowed: {method} {path}")]
	MethodNotAllowed {
		method: String,
		path: String,
		/// Methods that would have matched the path.
		allowed: Vec<String>,
	},

	/// Submitted data was rejected.
	#[error("Validation error: {0}")]
	Validation(String),

	/// Startup-time misconfiguration (bad route pattern, unknown field, ...).
	#[error("Improperly configured: {0}")]
	ImproperlyConfigured(String),

	/// Generic client error raised by a handler.
	#[error("HTTP error: {0}")]
	Http(String),

	#[error("Internal server error: {0}")]
	Internal(String),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// HTTP status code that best describes this error.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_core::exception::Error;
	///
	/// assert_eq!(Error::NotFound("/missing/".to_string()).status_code(), 404);
	/// assert_eq!(Error::Validation("bad".to_string()).status_code(), 400);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Self::NotFound(_) => 404,
			Self::MethodNotAllowed { .. } => 405,
			Self::Validation(_) | Self::Http(_) => 400,
			Self::ImproperlyConfigured(_) | Self::Internal(_) | Self::Other(_) => 500,
		}
	}

	/// Returns true for errors caused by the client rather than the server.
	pub fn is_client_error(&self) -> bool {
		(400..500).contains(&self.status_code())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Error::NotFound("/x/".to_string()), 404)]
	#[case(Error::MethodNotAllowed { method: "POST".to_string(), path: "/x/".to_string(), allowed: vec!["GET".to_string()] }, 405)]
	#[case(Error::Validation("bad".to_string()), 400)]
	#[case(Error::Http("bad".to_string()), 400)]
	#[case(Error::ImproperlyConfigured("oops".to_string()), 500)]
	#[case(Error::Internal("boom".to_string()), 500)]
	fn test_status_code_mapping(#[case] error: Error, #[case] expected: u16) {
		assert_eq!(error.status_code(), expected);
	}

	#[rstest]
	fn test_client_error_classification() {
		assert!(Error::NotFound("/".to_string()).is_client_error());
		assert!(!Error::Internal("boom".to_string()).is_client_error());
	}

	#[rstest]
	fn test_display_includes_context() {
		let err = Error::MethodNotAllowed {
			method: "DELETE".to_string(),
			path: "/items/1/".to_string(),
			allowed: vec!["GET".to_string()],
		};
		assert_eq!(err.to_string(), "Method not allowed: DELETE /items/1/");
	}

	#[rstest]
	fn test_anyhow_conversion() {
		let err: Error = anyhow::anyhow!("wrapped").into();
		assert_eq!(err.status_code(), 500);
		assert_eq!(err.to_string(), "wrapped");
	}
}
