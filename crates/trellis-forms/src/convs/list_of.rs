use super::{ConvResult, Converter};
use crate::error::ValidationError;
use crate::multidict::RawValue;
use crate::value::Value;
use std::sync::Arc;

/// Multiple-valued converter applying `inner` to every submitted value.
///
/// Empty items are dropped. The first failing item rejects the field.
///
/// # Examples
///
/// ```
/// use trellis_forms::convs::{Converter, Int, ListOf};
/// use trellis_forms::{RawValue, Value};
///
/// let conv = ListOf::new(Int::new());
/// let raw = [RawValue::from("1"), RawValue::from(""), RawValue::from("3")];
///
/// assert_eq!(conv.accept(&raw), Ok(Value::List(vec![Value::Int(1), Value::Int(3)])));
/// ```
#[derive(Debug, Clone)]
pub struct ListOf {
	inner: Arc<dyn Converter>,
	pub required: bool,
}

impl ListOf {
	pub fn new(inner: impl Converter + 'static) -> Self {
		Self {
			inner: Arc::new(inner),
			required: false,
		}
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn inner(&self) -> &Arc<dyn Converter> {
		&self.inner
	}
}

impl Converter for ListOf {
	fn accept(&self, raw: &[RawValue]) -> ConvResult {
		let mut items = Vec::with_capacity(raw.len());
		for value in raw {
			match self.inner.accept(std::slice::from_ref(value))? {
				Value::Null => {}
				item => items.push(item),
			}
		}
		if self.required && items.is_empty() {
			return Err(ValidationError::required());
		}
		Ok(Value::List(items))
	}

	fn from_value(&self, value: &Value) -> Vec<RawValue> {
		match value {
			Value::List(items) => items
				.iter()
				.flat_map(|item| self.inner.from_value(item))
				.collect(),
			_ => Vec::new(),
		}
	}

	fn is_required(&self) -> bool {
		self.required
	}

	fn is_multiple(&self) -> bool {
		true
	}

	fn expects_file(&self) -> bool {
		self.inner.expects_file()
	}

	fn choices(&self) -> Option<Vec<(String, String)>> {
		self.inner.choices()
	}
}
