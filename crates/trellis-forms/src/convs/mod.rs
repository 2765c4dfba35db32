//! Converters: raw submitted values in, clean [`Value`]s out.
//!
//! A converter is the validating half of a field. [`Converter::accept`]
//! parses raw values and [`Converter::from_value`] is its inverse, used to
//! fill raw data from clean values. For any value `v` a converter accepted,
//! `accept(from_value(v))` yields `v` again.

mod boolean;
mod enum_choice;
mod file;
mod int;
mod list_of;
mod text;

pub use boolean::{Bool, CHECKED};
pub use enum_choice::EnumChoice;
pub use file::FileConv;
pub use int::Int;
pub use list_of::ListOf;
pub use text::Char;

use crate::error::ValidationError;
use crate::multidict::RawValue;
use crate::value::Value;
use std::fmt;

pub type ConvResult = Result<Value, ValidationError>;

/// Parsing and validation of one field's raw values.
pub trait Converter: Send + Sync + fmt::Debug {
	/// Convert the raw values submitted for a field.
	///
	/// Single-valued converters receive at most one value.
	fn accept(&self, raw: &[RawValue]) -> ConvResult;

	/// Raw values that [`Converter::accept`] turns back into `value`.
	fn from_value(&self, value: &Value) -> Vec<RawValue>;

	fn is_required(&self) -> bool {
		false
	}

	fn is_multiple(&self) -> bool {
		false
	}

	/// Whether raw values must be uploaded files rather than text.
	fn expects_file(&self) -> bool {
		false
	}

	/// `(value, label)` pairs for choice converters.
	fn choices(&self) -> Option<Vec<(String, String)>> {
		None
	}

	/// Clean value of a field nobody filled in.
	fn empty_value(&self) -> Value {
		if self.is_multiple() {
			Value::List(Vec::new())
		} else {
			Value::Null
		}
	}
}

/// The text of a single-valued submission, empty when nothing was sent.
pub(crate) fn single_text(raw: &[RawValue]) -> &str {
	raw.last().and_then(RawValue::as_text).unwrap_or("")
}

/// Text form of a scalar value; `None` for null.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::Bool(b) => Some(b.to_string()),
		Value::Int(i) => Some(i.to_string()),
		Value::Str(s) => Some(s.clone()),
		Value::File(file) => Some(file.filename.clone()),
		Value::List(_) | Value::Map(_) => None,
	}
}
