use super::{ConvResult, Converter, scalar_text, single_text};
use crate::error::ValidationError;
use crate::multidict::RawValue;
use crate::value::Value;

/// Integer converter with optional bounds.
#[derive(Debug, Clone, Default)]
pub struct Int {
	pub required: bool,
	pub min: Option<i64>,
	pub max: Option<i64>,
}

impl Int {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_min(mut self, min: i64) -> Self {
		self.min = Some(min);
		self
	}

	pub fn with_max(mut self, max: i64) -> Self {
		self.max = Some(max);
		self
	}
}

impl Converter for Int {
	fn accept(&self, raw: &[RawValue]) -> ConvResult {
		let text = single_text(raw).trim();
		if text.is_empty() {
			return if self.required {
				Err(ValidationError::required())
			} else {
				Ok(Value::Null)
			};
		}

		let value: i64 = text
			.parse()
			.map_err(|_| ValidationError::new("it is not valid integer"))?;

		if let Some(min) = self.min
			&& value < min
		{
			return Err(ValidationError::new(format!("value should be >= {}", min)));
		}
		if let Some(max) = self.max
			&& value > max
		{
			return Err(ValidationError::new(format!("value should be <= {}", max)));
		}
		Ok(Value::Int(value))
	}

	fn from_value(&self, value: &Value) -> Vec<RawValue> {
		vec![RawValue::Text(scalar_text(value).unwrap_or_default())]
	}

	fn is_required(&self) -> bool {
		self.required
	}
}
