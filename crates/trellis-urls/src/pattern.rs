//! Route pattern compilation and matching.
//!
//! Patterns are literal text with placeholders:
//! - `/users/` - exact match
//! - `/users/{id}/` - one segment, kept as a string
//! - `/items/{id:int}/` - one segment converted to an integer
//! - `/static/{file:path}` - rest of the path, slashes included
//!
//! A pattern is compiled once into an anchored regex. Matching a path is a
//! two-step affair: the regex cuts out the placeholder text, then every
//! placeholder's converter must accept its text.

use crate::converters::{Converter, ConverterRegistry, ParamValue};
use crate::error::RouterError;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum allowed length for a pattern string in bytes.
pub const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A placeholder declared by a pattern.
#[derive(Debug, Clone)]
pub struct Placeholder {
	pub name: String,
	pub converter: Arc<dyn Converter>,
}

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
	pattern: String,
	regex: regex::Regex,
	placeholders: Vec<Placeholder>,
}

enum Piece<'a> {
	Literal(&'a str),
	Placeholder { name: &'a str, type_name: &'a str },
}

impl PathPattern {
	/// Compile a pattern with the built-in converters.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] for unbalanced braces, empty or
	/// duplicate placeholder names, unknown converter types, or patterns that
	/// are too long.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_urls::{PathPattern, ParamValue};
	///
	/// let pattern = PathPattern::new("/items/{id:int}/").unwrap();
	/// let params = pattern.matches("/items/42/").unwrap();
	/// assert_eq!(params.get("id"), Some(&ParamValue::Int(42)));
	///
	/// assert!(pattern.matches("/items/abc/").is_none());
	/// assert!(PathPattern::new("/items/{id:float}/").is_err());
	/// ```
	pub fn new(pattern: &str) -> Result<Self, RouterError> {
		Self::with_registry(pattern, &ConverterRegistry::new())
	}

	/// Compile a pattern resolving placeholder types through `registry`.
	pub fn with_registry(pattern: &str, registry: &ConverterRegistry) -> Result<Self, RouterError> {
		Self::with_limit(pattern, registry, MAX_PATTERN_LENGTH)
	}

	/// Compile a pattern with a custom maximum length.
	pub fn with_limit(
		pattern: &str,
		registry: &ConverterRegistry,
		max_length: usize,
	) -> Result<Self, RouterError> {
		if pattern.len() > max_length {
			return Err(RouterError::invalid_pattern(
				pattern,
				format!(
					"length {} exceeds maximum allowed length of {} bytes",
					pattern.len(),
					max_length
				),
			));
		}

		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(RouterError::invalid_pattern(
				pattern,
				format!(
					"{} path segments, exceeding maximum of {}",
					segment_count, MAX_PATH_SEGMENTS
				),
			));
		}

		let mut regex_str = String::from("^");
		let mut placeholders: Vec<Placeholder> = Vec::new();

		for piece in Self::parse(pattern)? {
			match piece {
				Piece::Literal(text) => regex_str.push_str(&regex::escape(text)),
				Piece::Placeholder { name, type_name } => {
					if !is_identifier(name) {
						return Err(RouterError::invalid_pattern(
							pattern,
							format!("invalid placeholder name '{}'", name),
						));
					}
					if placeholders.iter().any(|p| p.name == name) {
						return Err(RouterError::invalid_pattern(
							pattern,
							format!("duplicate placeholder '{}'", name),
						));
					}
					let converter = registry.get(type_name).ok_or_else(|| {
						RouterError::invalid_pattern(
							pattern,
							format!("unknown converter '{}'", type_name),
						)
					})?;
					regex_str.push('(');
					regex_str.push_str(converter.regex());
					regex_str.push(')');
					placeholders.push(Placeholder {
						name: name.to_string(),
						converter,
					});
				}
			}
		}
		regex_str.push('$');

		let regex = regex::RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| RouterError::invalid_pattern(pattern, e.to_string()))?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			placeholders,
		})
	}

	/// Split a pattern into literal text and placeholders.
	fn parse(pattern: &str) -> Result<Vec<Piece<'_>>, RouterError> {
		let mut pieces = Vec::new();
		let mut rest = pattern;

		while !rest.is_empty() {
			match rest.find(['{', '}']) {
				None => {
					pieces.push(Piece::Literal(rest));
					break;
				}
				Some(pos) if rest[pos..].starts_with('}') => {
					return Err(RouterError::invalid_pattern(pattern, "unmatched '}'"));
				}
				Some(pos) => {
					if pos > 0 {
						pieces.push(Piece::Literal(&rest[..pos]));
					}
					let after = &rest[pos + 1..];
					let end = after
						.find('}')
						.ok_or_else(|| RouterError::invalid_pattern(pattern, "unclosed '{'"))?;
					let body = &after[..end];
					if body.contains('{') {
						return Err(RouterError::invalid_pattern(pattern, "nested '{'"));
					}
					let (name, type_name) = match body.split_once(':') {
						Some((name, type_name)) => (name, type_name),
						None => (body, "str"),
					};
					pieces.push(Piece::Placeholder { name, type_name });
					rest = &after[end + 1..];
				}
			}
		}

		Ok(pieces)
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn placeholders(&self) -> &[Placeholder] {
		&self.placeholders
	}

	/// Names of the placeholders in pattern order.
	pub fn param_names(&self) -> Vec<&str> {
		self.placeholders.iter().map(|p| p.name.as_str()).collect()
	}

	/// Returns whether the pattern has no placeholders.
	pub fn is_exact(&self) -> bool {
		self.placeholders.is_empty()
	}

	/// Structural match only: the regex accepts the path, converters are not
	/// consulted.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Match `path` and convert every placeholder.
	///
	/// Returns `None` when the path does not fit the pattern or when any
	/// placeholder fails to convert.
	pub fn matches(&self, path: &str) -> Option<IndexMap<String, ParamValue>> {
		let caps = self.regex.captures(path)?;
		let mut params = IndexMap::with_capacity(self.placeholders.len());

		for (index, placeholder) in self.placeholders.iter().enumerate() {
			let raw = caps.get(index + 1)?.as_str();
			match placeholder.converter.to_value(raw) {
				Ok(value) => {
					params.insert(placeholder.name.clone(), value);
				}
				Err(err) => {
					tracing::trace!(pattern = %self.pattern, error = %err, "placeholder rejected");
					return None;
				}
			}
		}

		Some(params)
	}

	/// Build a path from this pattern.
	///
	/// # Errors
	///
	/// Returns [`RouterError::MissingParameter`] when a placeholder has no
	/// value and [`RouterError::InvalidParameter`] when its converter refuses
	/// the value.
	pub fn reverse(&self, params: &HashMap<String, ParamValue>) -> Result<String, RouterError> {
		let mut result = String::with_capacity(self.pattern.len());

		for piece in Self::parse(&self.pattern)? {
			match piece {
				Piece::Literal(text) => result.push_str(text),
				Piece::Placeholder { name, .. } => {
					let placeholder = self
						.placeholders
						.iter()
						.find(|p| p.name == name)
						.ok_or_else(|| RouterError::invalid_pattern(&self.pattern, "stale placeholder"))?;
					let value = params
						.get(name)
						.ok_or_else(|| RouterError::MissingParameter {
							route: self.pattern.clone(),
							param: name.to_string(),
						})?;
					let text = placeholder.converter.to_url(value).map_err(|e| {
						RouterError::InvalidParameter {
							param: name.to_string(),
							reason: e.to_string(),
						}
					})?;
					result.push_str(&text);
				}
			}
		}

		Ok(result)
	}
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for PathPattern {}

impl std::fmt::Display for PathPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
		_ => return false,
	}
	chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_exact_pattern() {
		let pattern = PathPattern::new("/users/").unwrap();
		assert!(pattern.is_exact());
		assert!(pattern.matches("/users/").is_some());
		assert!(pattern.matches("/users/123/").is_none());
	}

	#[rstest]
	fn test_default_placeholder_is_single_segment() {
		let pattern = PathPattern::new("/users/{name}/").unwrap();

		let params = pattern.matches("/users/alice/").unwrap();

		assert_eq!(params.get("name"), Some(&ParamValue::from("alice")));
		assert!(pattern.matches("/users/alice/bob/").is_none());
		assert!(pattern.matches("/users//").is_none());
	}

	#[rstest]
	fn test_typed_placeholders_keep_order() {
		let pattern = PathPattern::new("/users/{user_id:int}/posts/{slug:slug}/").unwrap();

		let params = pattern.matches("/users/42/posts/hello-world/").unwrap();

		assert_eq!(
			params.keys().collect::<Vec<_>>(),
			vec!["user_id", "slug"]
		);
		assert_eq!(params["user_id"], ParamValue::Int(42));
	}

	#[rstest]
	fn test_conversion_failure_is_no_match() {
		let pattern = PathPattern::new("/items/{id:int}").unwrap();

		assert!(pattern.is_match("/items/abc"));
		assert!(pattern.matches("/items/abc").is_none());
	}

	#[rstest]
	fn test_path_placeholder_spans_segments() {
		let pattern = PathPattern::new("/static/{file:path}").unwrap();

		let params = pattern.matches("/static/css/site/main.css").unwrap();

		assert_eq!(params["file"], ParamValue::from("css/site/main.css"));
	}

	#[rstest]
	fn test_special_chars_escaped() {
		let pattern = PathPattern::new("/api/v1.0/").unwrap();
		assert!(pattern.matches("/api/v1.0/").is_some());
		assert!(pattern.matches("/api/v1X0/").is_none());
	}

	#[rstest]
	#[case("/items/{id", "unclosed '{'")]
	#[case("/items/id}/", "unmatched '}'")]
	#[case("/items/{}/", "invalid placeholder name")]
	#[case("/items/{1id}/", "invalid placeholder name")]
	#[case("/items/{id:float}/", "unknown converter 'float'")]
	#[case("/a/{id}/b/{id}/", "duplicate placeholder 'id'")]
	#[case("/a/{x{y}}/", "nested '{'")]
	fn test_malformed_patterns(#[case] source: &str, #[case] reason: &str) {
		let err = PathPattern::new(source).unwrap_err();

		assert!(
			err.to_string().contains(reason),
			"unexpected error for {}: {}",
			source,
			err
		);
	}

	#[rstest]
	fn test_pattern_rejects_excessive_length() {
		let long_pattern = "/".to_string() + &"a".repeat(1025);

		let result = PathPattern::new(&long_pattern);

		assert!(
			result
				.unwrap_err()
				.to_string()
				.contains("exceeds maximum allowed length")
		);
	}

	#[rstest]
	fn test_pattern_rejects_excessive_segments() {
		let segments: Vec<&str> = (0..35).map(|_| "seg").collect();
		let pattern = format!("/{}/", segments.join("/"));

		let result = PathPattern::new(&pattern);

		assert!(result.unwrap_err().to_string().contains("exceeding maximum"));
	}

	#[rstest]
	fn test_reverse_uses_converters() {
		let pattern = PathPattern::new("/users/{id:int}/posts/{slug:slug}/").unwrap();
		let mut params = HashMap::new();
		params.insert("id".to_string(), ParamValue::Int(7));
		params.insert("slug".to_string(), ParamValue::from("intro"));

		assert_eq!(pattern.reverse(&params).unwrap(), "/users/7/posts/intro/");

		params.insert("id".to_string(), ParamValue::from("seven"));
		assert!(matches!(
			pattern.reverse(&params),
			Err(RouterError::InvalidParameter { .. })
		));
	}

	#[rstest]
	fn test_reverse_missing_param() {
		let pattern = PathPattern::new("/users/{id}/").unwrap();

		let result = pattern.reverse(&HashMap::new());

		assert!(matches!(
			result,
			Err(RouterError::MissingParameter { ref param, .. }) if param == "id"
		));
	}

	#[rstest]
	fn test_pattern_equality() {
		let p1 = PathPattern::new("/users/{id}/").unwrap();
		let p2 = PathPattern::new("/users/{id}/").unwrap();
		let p3 = PathPattern::new("/users/{user_id}/").unwrap();

		assert_eq!(p1, p2);
		assert_ne!(p1, p3);
		assert_eq!(format!("{}", p1), "/users/{id}/");
	}
}
