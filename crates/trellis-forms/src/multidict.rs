//! Submitted raw data.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// An uploaded file as received from a multipart body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
	pub filename: String,
	pub content_type: Option<String>,
	pub content: Bytes,
}

impl UploadedFile {
	pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
		Self {
			filename: filename.into(),
			content_type: None,
			content: content.into(),
		}
	}

	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}

	pub fn size(&self) -> usize {
		self.content.len()
	}
}

/// One submitted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
	Text(String),
	File(UploadedFile),
}

impl RawValue {
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			Self::File(_) => None,
		}
	}

	pub fn as_file(&self) -> Option<&UploadedFile> {
		match self {
			Self::File(file) => Some(file),
			Self::Text(_) => None,
		}
	}

	/// An empty text value, as browsers send for untouched inputs.
	pub fn is_blank(&self) -> bool {
		matches!(self, Self::Text(text) if text.is_empty())
	}
}

impl From<&str> for RawValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for RawValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<UploadedFile> for RawValue {
	fn from(value: UploadedFile) -> Self {
		Self::File(value)
	}
}

/// Ordered multi-valued mapping of input names to raw values.
///
/// # Examples
///
/// ```
/// use trellis_forms::MultiDict;
///
/// let data = MultiDict::from_urlencoded("tag=a&tag=b&name=x").unwrap();
///
/// assert_eq!(data.get_text("tag"), Some("b"));
/// assert_eq!(data.get_all("tag").len(), 2);
/// assert!(data.get("missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiDict {
	items: Vec<(String, RawValue)>,
}

impl MultiDict {
	pub fn new() -> Self {
		Self::default()
	}

	/// Decode an `application/x-www-form-urlencoded` string.
	///
	/// # Errors
	///
	/// Returns the decoding error for malformed input.
	pub fn from_urlencoded(input: &str) -> Result<Self, serde_urlencoded::de::Error> {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_str(input)?;
		Ok(Self::from_pairs(pairs))
	}

	pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<RawValue>,
	{
		Self {
			items: pairs
				.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		}
	}

	/// Last value submitted under `name`.
	pub fn get(&self, name: &str) -> Option<&RawValue> {
		self.items
			.iter()
			.rev()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value)
	}

	/// Last text value submitted under `name`.
	pub fn get_text(&self, name: &str) -> Option<&str> {
		self.get(name).and_then(RawValue::as_text)
	}

	pub fn get_all(&self, name: &str) -> Vec<&RawValue> {
		self.items
			.iter()
			.filter(|(key, _)| key == name)
			.map(|(_, value)| value)
			.collect()
	}

	pub fn add(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
		self.items.push((name.into(), value.into()));
	}

	/// Replace every value of `name` with a single one.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
		let name = name.into();
		self.remove(&name);
		self.items.push((name, value.into()));
	}

	/// Remove every value of `name`, returning how many were removed.
	pub fn remove(&mut self, name: &str) -> usize {
		let before = self.items.len();
		self.items.retain(|(key, _)| key != name);
		before - self.items.len()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.items.iter().any(|(key, _)| key == name)
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
		self.items.iter().map(|(key, value)| (key.as_str(), value))
	}
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for MultiDict {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self::from_pairs(iter)
	}
}
