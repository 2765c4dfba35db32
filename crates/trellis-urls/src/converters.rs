//! Placeholder converters.
//!
//! A converter decides what a `{name:type}` placeholder accepts. It declares
//! the regex fragment used to cut the placeholder out of the path, turns the
//! captured text into a [`ParamValue`], and renders a value back into URL form
//! when reversing.
//!
//! | type   | captures              | value               |
//! |--------|-----------------------|---------------------|
//! | `str`  | one non-empty segment | [`ParamValue::Str`] |
//! | `int`  | one segment           | [`ParamValue::Int`] |
//! | `slug` | one segment           | [`ParamValue::Str`] |
//! | `uuid` | one segment           | [`ParamValue::Uuid`]|
//! | `path` | rest of the path      | [`ParamValue::Str`] |

use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};
use uuid::Uuid;

/// Regex fragment matching exactly one path segment.
pub const SEGMENT: &str = "[^/]+";

static SLUG_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("SLUG_REGEX: invalid regex pattern"));

/// A typed value extracted from a path placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
	Str(String),
	Int(i64),
	Uuid(Uuid),
}

impl ParamValue {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_uuid(&self) -> Option<Uuid> {
		match self {
			Self::Uuid(u) => Some(*u),
			_ => None,
		}
	}
}

impl fmt::Display for ParamValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Str(s) => write!(f, "{}", s),
			Self::Int(i) => write!(f, "{}", i),
			Self::Uuid(u) => write!(f, "{}", u.hyphenated()),
		}
	}
}

impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for ParamValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<i64> for ParamValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<Uuid> for ParamValue {
	fn from(value: Uuid) -> Self {
		Self::Uuid(value)
	}
}

/// Conversion failure for a single placeholder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert '{raw}' to {type_name}: {reason}")]
pub struct ConverterError {
	pub type_name: &'static str,
	pub raw: String,
	pub reason: String,
}

pub type ConverterResult<T> = Result<T, ConverterError>;

/// Behaviour of a placeholder type.
pub trait Converter: Send + Sync + fmt::Debug {
	/// Name used in patterns (`{id:int}` -> `"int"`).
	fn type_name(&self) -> &'static str;

	/// Regex fragment the placeholder captures. Must not contain capture
	/// groups.
	fn regex(&self) -> &str {
		SEGMENT
	}

	/// Convert captured text. An error rejects the route for this path.
	fn to_value(&self, raw: &str) -> ConverterResult<ParamValue>;

	/// Render a value for URL reversal.
	fn to_url(&self, value: &ParamValue) -> ConverterResult<String>;
}

fn fail(type_name: &'static str, raw: impl Into<String>, reason: impl Into<String>) -> ConverterError {
	ConverterError {
		type_name,
		raw: raw.into(),
		reason: reason.into(),
	}
}

/// Any single non-empty segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrConverter;

impl Converter for StrConverter {
	fn type_name(&self) -> &'static str {
		"str"
	}

	fn to_value(&self, raw: &str) -> ConverterResult<ParamValue> {
		Ok(ParamValue::Str(raw.to_string()))
	}

	fn to_url(&self, value: &ParamValue) -> ConverterResult<String> {
		let text = value.to_string();
		if text.is_empty() || text.contains('/') {
			return Err(fail(
				self.type_name(),
				text,
				"must be a non-empty segment without '/'",
			));
		}
		Ok(text)
	}
}

/// Signed 64-bit integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntConverter;

impl Converter for IntConverter {
	fn type_name(&self) -> &'static str {
		"int"
	}

	fn to_value(&self, raw: &str) -> ConverterResult<ParamValue> {
		raw.parse::<i64>()
			.map(ParamValue::Int)
			.map_err(|e| fail(self.type_name(), raw, e.to_string()))
	}

	fn to_url(&self, value: &ParamValue) -> ConverterResult<String> {
		match value {
			ParamValue::Int(i) => Ok(i.to_string()),
			ParamValue::Str(s) => self.to_value(s).map(|v| v.to_string()),
			other => Err(fail(self.type_name(), other.to_string(), "not an integer")),
		}
	}
}

/// ASCII letters, digits, hyphens and underscores.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlugConverter;

impl Converter for SlugConverter {
	fn type_name(&self) -> &'static str {
		"slug"
	}

	fn to_value(&self, raw: &str) -> ConverterResult<ParamValue> {
		if SLUG_REGEX.is_match(raw) {
			Ok(ParamValue::Str(raw.to_string()))
		} else {
			Err(fail(self.type_name(), raw, "not a slug"))
		}
	}

	fn to_url(&self, value: &ParamValue) -> ConverterResult<String> {
		let text = value.to_string();
		self.to_value(&text).map(|_| text)
	}
}

/// Hyphenated UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidConverter;

impl Converter for UuidConverter {
	fn type_name(&self) -> &'static str {
		"uuid"
	}

	fn to_value(&self, raw: &str) -> ConverterResult<ParamValue> {
		// Uuid::parse_str also accepts the simple and braced forms
		if raw.len() != 36 {
			return Err(fail(self.type_name(), raw, "expected a hyphenated UUID"));
		}
		Uuid::parse_str(raw)
			.map(ParamValue::Uuid)
			.map_err(|e| fail(self.type_name(), raw, e.to_string()))
	}

	fn to_url(&self, value: &ParamValue) -> ConverterResult<String> {
		match value {
			ParamValue::Uuid(u) => Ok(u.hyphenated().to_string()),
			ParamValue::Str(s) => self.to_value(s).map(|v| v.to_string()),
			other => Err(fail(self.type_name(), other.to_string(), "not a UUID")),
		}
	}
}

/// Remainder of the path, slashes included.
///
/// Captured values are not sanitized: callers using them for file system
/// access must reject `..` segments themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathConverter;

impl Converter for PathConverter {
	fn type_name(&self) -> &'static str {
		"path"
	}

	fn regex(&self) -> &str {
		".+"
	}

	fn to_value(&self, raw: &str) -> ConverterResult<ParamValue> {
		Ok(ParamValue::Str(raw.to_string()))
	}

	fn to_url(&self, value: &ParamValue) -> ConverterResult<String> {
		let text = value.to_string();
		if text.is_empty() {
			return Err(fail(self.type_name(), text, "must not be empty"));
		}
		Ok(text)
	}
}

/// Converters available to patterns, looked up by type name.
#[derive(Debug, Clone)]
pub struct ConverterRegistry {
	converters: HashMap<String, Arc<dyn Converter>>,
}

impl ConverterRegistry {
	/// Registry holding the built-in converters.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_urls::ConverterRegistry;
	///
	/// let registry = ConverterRegistry::new();
	/// assert!(registry.get("int").is_some());
	/// assert!(registry.get("float").is_none());
	/// ```
	pub fn new() -> Self {
		let mut registry = Self {
			converters: HashMap::new(),
		};
		registry.register("str", Arc::new(StrConverter));
		registry.register("int", Arc::new(IntConverter));
		registry.register("slug", Arc::new(SlugConverter));
		registry.register("uuid", Arc::new(UuidConverter));
		registry.register("path", Arc::new(PathConverter));
		registry
	}

	/// Add or replace a converter.
	pub fn register(&mut self, name: impl Into<String>, converter: Arc<dyn Converter>) {
		self.converters.insert(name.into(), converter);
	}

	pub fn get(&self, name: &str) -> Option<Arc<dyn Converter>> {
		self.converters.get(name).cloned()
	}

	/// Copy converters from `other` whose names are not registered here.
	pub fn extend_missing(&mut self, other: &ConverterRegistry) {
		for (name, converter) in &other.converters {
			self.converters
				.entry(name.clone())
				.or_insert_with(|| Arc::clone(converter));
		}
	}
}

impl Default for ConverterRegistry {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("42", Some(ParamValue::Int(42)))]
	#[case("-7", Some(ParamValue::Int(-7)))]
	#[case("abc", None)]
	#[case("4.2", None)]
	#[case("99999999999999999999", None)]
	fn test_int_converter(#[case] raw: &str, #[case] expected: Option<ParamValue>) {
		assert_eq!(IntConverter.to_value(raw).ok(), expected);
	}

	#[rstest]
	fn test_slug_converter_rejects_spaces() {
		assert!(SlugConverter.to_value("my-post_1").is_ok());
		assert!(SlugConverter.to_value("my post").is_err());
	}

	#[rstest]
	fn test_uuid_converter_requires_hyphenated_form() {
		let raw = "67e55044-10b1-426f-9247-bb680e5fe0c8";

		let value = UuidConverter.to_value(raw).unwrap();

		assert_eq!(value.to_string(), raw);
		assert!(UuidConverter.to_value("67e5504410b1426f9247bb680e5fe0c8").is_err());
	}

	#[rstest]
	fn test_to_url_validates_values() {
		assert_eq!(IntConverter.to_url(&ParamValue::from("12")).unwrap(), "12");
		assert!(IntConverter.to_url(&ParamValue::from("twelve")).is_err());
		assert!(StrConverter.to_url(&ParamValue::from("a/b")).is_err());
		assert_eq!(
			PathConverter.to_url(&ParamValue::from("a/b")).unwrap(),
			"a/b"
		);
	}

	#[rstest]
	fn test_converter_error_message() {
		let err = IntConverter.to_value("abc").unwrap_err();
		assert!(err.to_string().starts_with("cannot convert 'abc' to int"));
	}
}
