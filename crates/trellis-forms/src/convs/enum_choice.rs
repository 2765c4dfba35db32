use super::{ConvResult, Converter, scalar_text, single_text};
use crate::error::ValidationError;
use crate::multidict::RawValue;
use crate::value::Value;

/// One of a fixed set of string choices.
///
/// # Examples
///
/// ```
/// use trellis_forms::convs::{Converter, EnumChoice};
/// use trellis_forms::{RawValue, Value};
///
/// let conv = EnumChoice::new([("s", "Small"), ("l", "Large")]);
///
/// assert_eq!(conv.accept(&[RawValue::from("l")]), Ok(Value::from("l")));
/// assert!(conv.accept(&[RawValue::from("xl")]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct EnumChoice {
	choices: Vec<(String, String)>,
	pub required: bool,
}

impl EnumChoice {
	pub fn new<V, L>(choices: impl IntoIterator<Item = (V, L)>) -> Self
	where
		V: Into<String>,
		L: Into<String>,
	{
		Self {
			choices: choices
				.into_iter()
				.map(|(value, label)| (value.into(), label.into()))
				.collect(),
			required: false,
		}
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn label_for(&self, value: &str) -> Option<&str> {
		self.choices
			.iter()
			.find(|(choice, _)| choice == value)
			.map(|(_, label)| label.as_str())
	}
}

impl Converter for EnumChoice {
	fn accept(&self, raw: &[RawValue]) -> ConvResult {
		let text = single_text(raw);
		if text.is_empty() {
			return if self.required {
				Err(ValidationError::required())
			} else {
				Ok(Value::Null)
			};
		}
		if self.label_for(text).is_none() {
			return Err(ValidationError::new("no such choice"));
		}
		Ok(Value::Str(text.to_string()))
	}

	fn from_value(&self, value: &Value) -> Vec<RawValue> {
		vec![RawValue::Text(scalar_text(value).unwrap_or_default())]
	}

	fn is_required(&self) -> bool {
		self.required
	}

	fn choices(&self) -> Option<Vec<(String, String)>> {
		Some(self.choices.clone())
	}
}
