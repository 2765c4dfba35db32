//! Converted ("clean") values.

use crate::multidict::UploadedFile;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A value produced by a converter.
///
/// Leaf fields produce scalars (or `List` for multiple-valued converters),
/// field sets produce `Map` and field lists produce `List`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
	#[default]
	Null,
	Bool(bool),
	Int(i64),
	Str(String),
	List(Vec<Value>),
	File(UploadedFile),
	Map(IndexMap<String, Value>),
}

impl Value {
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
		match self {
			Self::Map(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_file(&self) -> Option<&UploadedFile> {
		match self {
			Self::File(file) => Some(file),
			_ => None,
		}
	}

	/// Look up a nested value by dotted path (`address.city`, `phones.2`).
	/// List segments are 1-based, matching list input names.
	pub fn pointer(&self, path: &str) -> Option<&Value> {
		path.split('.').try_fold(self, |current, segment| match current {
			Self::Map(map) => map.get(segment),
			Self::List(items) => segment
				.parse::<usize>()
				.ok()
				.and_then(|index| index.checked_sub(1))
				.and_then(|index| items.get(index)),
			_ => None,
		})
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(value: Vec<Value>) -> Self {
		Self::List(value)
	}
}

impl From<IndexMap<String, Value>> for Value {
	fn from(value: IndexMap<String, Value>) -> Self {
		Self::Map(value)
	}
}

impl From<UploadedFile> for Value {
	fn from(value: UploadedFile) -> Self {
		Self::File(value)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_pointer_walks_maps_and_lists() {
		let mut address = IndexMap::new();
		address.insert("city".to_string(), Value::from("Lyon"));
		let mut root = IndexMap::new();
		root.insert("address".to_string(), Value::Map(address));
		root.insert(
			"phones".to_string(),
			Value::List(vec![Value::from("111"), Value::from("222")]),
		);
		let value = Value::Map(root);

		assert_eq!(value.pointer("address.city"), Some(&Value::from("Lyon")));
		assert_eq!(value.pointer("phones.2"), Some(&Value::from("222")));
		assert_eq!(value.pointer("phones.0"), None);
		assert_eq!(value.pointer("address.zip"), None);
	}

	#[rstest]
	fn test_serializes_as_plain_json() {
		let value = Value::List(vec![Value::Int(1), Value::Null, Value::from("a")]);

		let json = serde_json::to_string(&value).unwrap();

		assert_eq!(json, r#"[1,null,"a"]"#);
	}
}
