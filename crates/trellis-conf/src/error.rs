use std::path::PathBuf;
use trellis_core::exception::Error;

/// Errors raised while loading or merging settings.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	/// A source marked as required could not be found.
	#[error("Required settings file not found: {}", .0.display())]
	MissingFile(PathBuf),

	#[error("Setting '{0}' is not defined")]
	MissingValue(String),

	#[error("Invalid value for '{key}': {reason}")]
	InvalidValue { key: String, reason: String },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

impl From<SettingsError> for Error {
	fn from(err: SettingsError) -> Self {
		Error::ImproperlyConfigured(err.to_string())
	}
}
