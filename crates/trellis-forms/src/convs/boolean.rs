use super::{ConvResult, Converter, single_text};
use crate::error::ValidationError;
use crate::multidict::RawValue;
use crate::value::Value;

/// Value submitted by a checked checkbox.
pub const CHECKED: &str = "checked";

/// Checkbox converter: any non-empty submission is `true`.
///
/// A required `Bool` must be checked.
#[derive(Debug, Clone, Default)]
pub struct Bool {
	pub required: bool,
}

impl Bool {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
}

impl Converter for Bool {
	fn accept(&self, raw: &[RawValue]) -> ConvResult {
		let checked = !single_text(raw).is_empty();
		if self.required && !checked {
			return Err(ValidationError::required());
		}
		Ok(Value::Bool(checked))
	}

	fn from_value(&self, value: &Value) -> Vec<RawValue> {
		match value {
			Value::Bool(true) => vec![RawValue::from(CHECKED)],
			_ => Vec::new(),
		}
	}

	fn is_required(&self) -> bool {
		self.required
	}

	fn empty_value(&self) -> Value {
		Value::Bool(false)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_bool_accept() {
		let conv = Bool::new();

		assert_eq!(conv.accept(&[RawValue::from("on")]), Ok(Value::Bool(true)));
		assert_eq!(conv.accept(&[]), Ok(Value::Bool(false)));
		assert_eq!(
			Bool::new().required().accept(&[]),
			Err(ValidationError::required())
		);
	}

	#[rstest]
	fn test_from_value_round_trips() {
		let conv = Bool::new();

		for value in [Value::Bool(true), Value::Bool(false)] {
			assert_eq!(conv.accept(&conv.from_value(&value)), Ok(value));
		}
	}
}
