//! Form errors.
//!
//! Two different kinds of failure live here:
//! - [`FormError`]: structural misuse of a schema (unknown or duplicate field
//!   names). These are programming errors and are propagated with `?`.
//! - [`ValidationError`] and [`FormErrors`]: user input that did not convert.
//!   These are data, kept on the form for re-rendering.

use indexmap::IndexMap;
use serde::Serialize;
use trellis_core::exception::Error;

/// Special key for form-level (non-field-specific) errors.
pub const ALL_FIELDS_KEY: &str = "_all";

/// Structural misuse of a form schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
	#[error("Unknown field '{0}'")]
	UnknownField(String),
	#[error("Duplicate field '{name}' in '{container}'")]
	DuplicateField { container: String, name: String },
	#[error("Invalid field name '{0}'")]
	InvalidFieldName(String),
}

pub type FormResult<T> = Result<T, FormError>;

impl From<FormError> for Error {
	fn from(err: FormError) -> Self {
		Error::ImproperlyConfigured(err.to_string())
	}
}

/// A rejected value, with the message shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
	pub message: String,
}

impl ValidationError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	pub fn required() -> Self {
		Self::new("required field")
	}
}

/// Per-field error messages keyed by input name, in the order they occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors {
	errors: IndexMap<String, String>,
}

impl FormErrors {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record an error. The first error recorded for an input name is kept.
	pub fn insert(&mut self, input_name: impl Into<String>, message: impl Into<String>) {
		self.errors
			.entry(input_name.into())
			.or_insert_with(|| message.into());
	}

	pub fn get(&self, input_name: &str) -> Option<&str> {
		self.errors.get(input_name).map(String::as_str)
	}

	pub fn contains(&self, input_name: &str) -> bool {
		self.errors.contains_key(input_name)
	}

	/// Errors not tied to a single field.
	pub fn non_field(&self) -> Option<&str> {
		self.get(ALL_FIELDS_KEY)
	}

	pub fn len(&self) -> usize {
		self.errors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn clear(&mut self) {
		self.errors.clear();
	}
}

impl std::fmt::Display for FormErrors {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let parts: Vec<String> = self
			.errors
			.iter()
			.map(|(name, message)| format!("{}: {}", name, message))
			.collect();
		write!(f, "{}", parts.join("; "))
	}
}

impl From<FormErrors> for Error {
	fn from(errors: FormErrors) -> Self {
		Error::Validation(errors.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_first_error_per_field_is_kept() {
		let mut errors = FormErrors::new();

		errors.insert("age", "it is not valid integer");
		errors.insert("age", "value should be >= 0");
		errors.insert(ALL_FIELDS_KEY, "passwords differ");

		assert_eq!(errors.len(), 2);
		assert_eq!(errors.get("age"), Some("it is not valid integer"));
		assert_eq!(errors.non_field(), Some("passwords differ"));
	}

	#[rstest]
	fn test_errors_serialize_as_map() {
		let mut errors = FormErrors::new();
		errors.insert("name", "required field");

		let json = serde_json::to_value(&errors).unwrap();

		assert_eq!(json, serde_json::json!({"name": "required field"}));
	}

	#[rstest]
	fn test_conversions_into_core_error() {
		let structural: Error = FormError::UnknownField("nope".to_string()).into();
		let mut errors = FormErrors::new();
		errors.insert("name", "required field");
		let invalid: Error = errors.into();

		assert_eq!(structural.status_code(), 500);
		assert_eq!(invalid.status_code(), 400);
		assert_eq!(invalid.to_string(), "Validation error: name: required field");
	}
}
