use super::{ConvResult, Converter, scalar_text, single_text};
use crate::error::ValidationError;
use crate::multidict::RawValue;
use crate::value::Value;
use regex::Regex;

/// Text converter with optional stripping, length bounds and a pattern.
///
/// An empty submission converts to [`Value::Null`].
///
/// # Examples
///
/// ```
/// use trellis_forms::convs::{Char, Converter};
/// use trellis_forms::{RawValue, Value};
///
/// let conv = Char::new().with_max_length(5);
///
/// assert_eq!(conv.accept(&[RawValue::from("  hi ")]), Ok(Value::from("hi")));
/// assert_eq!(conv.accept(&[]), Ok(Value::Null));
/// assert!(conv.accept(&[RawValue::from("too long")]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Char {
	pub required: bool,
	pub strip: bool,
	pub min_length: Option<usize>,
	pub max_length: Option<usize>,
	regex: Option<Regex>,
	full_match: Option<Regex>,
	regex_message: String,
}

impl Char {
	pub fn new() -> Self {
		Self {
			required: false,
			strip: true,
			min_length: None,
			max_length: None,
			regex: None,
			full_match: None,
			regex_message: "field should match {}".to_string(),
		}
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn no_strip(mut self) -> Self {
		self.strip = false;
		self
	}

	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = Some(min_length);
		self
	}

	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}

	/// Require the whole value to match `regex`.
	///
	/// `{}` in `message` is replaced by the pattern.
	pub fn with_regex(mut self, regex: Regex, message: Option<&str>) -> Self {
		if let Some(message) = message {
			self.regex_message = message.to_string();
		}
		self.full_match = Regex::new(&format!(r"\A(?:{})\z", regex.as_str())).ok();
		self.regex = Some(regex);
		self
	}

	fn matches_whole(&self, regex: &Regex, text: &str) -> bool {
		match &self.full_match {
			Some(full) => full.is_match(text),
			None => regex
				.find(text)
				.is_some_and(|m| m.start() == 0 && m.end() == text.len()),
		}
	}
}

impl Default for Char {
	fn default() -> Self {
		Self::new()
	}
}

impl Converter for Char {
	fn accept(&self, raw: &[RawValue]) -> ConvResult {
		let text = single_text(raw);
		let text = if self.strip { text.trim() } else { text };

		if text.is_empty() {
			return if self.required {
				Err(ValidationError::required())
			} else {
				Ok(Value::Null)
			};
		}

		let length = text.chars().count();
		if let Some(min) = self.min_length
			&& length < min
		{
			return Err(ValidationError::new(format!(
				"length should be at least {} characters",
				min
			)));
		}
		if let Some(max) = self.max_length
			&& length > max
		{
			return Err(ValidationError::new(format!(
				"length should be at most {} characters",
				max
			)));
		}
		if let Some(regex) = &self.regex
			&& !self.matches_whole(regex, text)
		{
			return Err(ValidationError::new(
				self.regex_message.replace("{}", regex.as_str()),
			));
		}

		Ok(Value::Str(text.to_string()))
	}

	fn from_value(&self, value: &Value) -> Vec<RawValue> {
		vec![RawValue::Text(scalar_text(value).unwrap_or_default())]
	}

	fn is_required(&self) -> bool {
		self.required
	}
}
