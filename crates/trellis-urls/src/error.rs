//! Error types for route registration and URL reversal.

use trellis_core::exception::Error;

/// Errors raised while building a router or reversing a URL.
///
/// A request that simply matches no route is not an error: matching returns
/// `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
	/// The same pattern is already bound for this method.
	#[error("Route conflict: {method} {pattern} is already registered")]
	Conflict { pattern: String, method: String },

	/// The pattern could not be compiled.
	#[error("Invalid route pattern '{pattern}': {reason}")]
	InvalidPattern { pattern: String, reason: String },

	/// A route was registered without any HTTP method.
	#[error("Route '{0}' must accept at least one method")]
	EmptyMethodSet(String),

	/// No route carries the requested name.
	#[error("Reverse for '{0}' not found")]
	NoReverseMatch(String),

	/// A placeholder of the named route had no value.
	#[error("Missing parameter '{param}' for route '{route}'")]
	MissingParameter { route: String, param: String },

	/// A value could not be rendered by the placeholder's converter.
	#[error("Invalid value for parameter '{param}': {reason}")]
	InvalidParameter { param: String, reason: String },
}

impl RouterError {
	pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
		Self::InvalidPattern {
			pattern: pattern.to_string(),
			reason: reason.into(),
		}
	}
}

impl From<RouterError> for Error {
	fn from(err: RouterError) -> Self {
		Error::ImproperlyConfigured(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_conflict_display() {
		let err = RouterError::Conflict {
			pattern: "/items/{id:int}".to_string(),
			method: "GET".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"Route conflict: GET /items/{id:int} is already registered"
		);
	}

	#[rstest]
	fn test_converts_to_improperly_configured() {
		let err: Error = RouterError::NoReverseMatch("users:detail".to_string()).into();
		assert!(matches!(err, Error::ImproperlyConfigured(_)));
		assert_eq!(err.status_code(), 500);
	}
}
