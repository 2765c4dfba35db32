use super::{ConvResult, Converter};
use crate::error::ValidationError;
use crate::multidict::RawValue;
use crate::value::Value;

/// Uploaded file converter.
#[derive(Debug, Clone, Default)]
pub struct FileConv {
	pub required: bool,
	/// Maximum accepted size in bytes.
	pub max_size: Option<usize>,
	/// Accepted content types; empty accepts any.
	pub content_types: Vec<String>,
}

impl FileConv {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_max_size(mut self, max_size: usize) -> Self {
		self.max_size = Some(max_size);
		self
	}

	pub fn with_content_types<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
		self.content_types = types.into_iter().map(Into::into).collect();
		self
	}
}

impl Converter for FileConv {
	fn accept(&self, raw: &[RawValue]) -> ConvResult {
		let Some(file) = raw.last().and_then(RawValue::as_file) else {
			return if self.required {
				Err(ValidationError::required())
			} else {
				Ok(Value::Null)
			};
		};

		if let Some(max) = self.max_size
			&& file.size() > max
		{
			return Err(ValidationError::new(format!(
				"file should be at most {} bytes",
				max
			)));
		}
		if !self.content_types.is_empty() {
			let allowed = file
				.content_type
				.as_ref()
				.is_some_and(|ct| self.content_types.contains(ct));
			if !allowed {
				return Err(ValidationError::new("file type is not allowed"));
			}
		}
		Ok(Value::File(file.clone()))
	}

	fn from_value(&self, value: &Value) -> Vec<RawValue> {
		match value {
			Value::File(file) => vec![RawValue::File(file.clone())],
			_ => Vec::new(),
		}
	}

	fn is_required(&self) -> bool {
		self.required
	}

	fn expects_file(&self) -> bool {
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::multidict::UploadedFile;
	use rstest::rstest;

	#[rstest]
	fn test_file_limits() {
		let conv = FileConv::new()
			.with_max_size(4)
			.with_content_types(["image/png"]);
		let small = UploadedFile::new("a.png", &b"png"[..]).with_content_type("image/png");
		let large = UploadedFile::new("b.png", &b"large"[..]).with_content_type("image/png");
		let text = UploadedFile::new("c.txt", &b"txt"[..]).with_content_type("text/plain");

		assert_eq!(
			conv.accept(&[RawValue::File(small.clone())]),
			Ok(Value::File(small))
		);
		assert!(conv.accept(&[RawValue::File(large)]).is_err());
		assert_eq!(
			conv.accept(&[RawValue::File(text)]),
			Err(ValidationError::new("file type is not allowed"))
		);
	}

	#[rstest]
	fn test_missing_file() {
		assert_eq!(FileConv::new().accept(&[]), Ok(Value::Null));
		assert_eq!(
			FileConv::new().required().accept(&[]),
			Err(ValidationError::required())
		);
	}
}
