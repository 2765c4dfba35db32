//! Merging of configuration sources.

use crate::error::{SettingsError, SettingsResult};
use crate::settings::Settings;
use crate::sources::{ConfigSource, merge_value};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Collects [`ConfigSource`]s and merges them into [`MergedSettings`].
///
/// Sources are applied from lowest to highest priority; sources of equal
/// priority apply in the order they were added, so the later one wins.
/// Nested tables merge key by key.
///
/// # Examples
///
/// ```
/// use trellis_conf::{DefaultSource, EnvSource, SettingsBuilder};
/// use serde_json::json;
///
/// let merged = SettingsBuilder::new()
///     .add_source(DefaultSource::new().with_value("forms", json!({ "id_prefix": "", "null_label": "--------" })))
///     .add_source(EnvSource::new().with_vars([("TRELLIS_FORMS__ID_PREFIX", "app-")]))
///     .build()
///     .unwrap();
///
/// assert_eq!(merged.get::<String>("forms.id_prefix").unwrap(), "app-");
/// assert_eq!(merged.get::<String>("forms.null_label").unwrap(), "--------");
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Load every source and merge the results.
	///
	/// # Errors
	///
	/// The first error returned by a source.
	pub fn build(mut self) -> SettingsResult<MergedSettings> {
		self.sources.sort_by_key(|source| source.priority());

		let mut merged = Value::Object(Default::default());
		for source in &self.sources {
			let values = source.load()?;
			tracing::debug!(
				source = %source.description(),
				keys = values.len(),
				"loaded settings source"
			);
			merge_value(&mut merged, Value::Object(values.into_iter().collect()));
		}

		let data = match merged {
			Value::Object(map) => map.into_iter().collect(),
			_ => IndexMap::new(),
		};
		Ok(MergedSettings { data })
	}
}

/// The merged key/value tree produced by [`SettingsBuilder::build`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSettings {
	data: IndexMap<String, Value>,
}

impl MergedSettings {
	/// Look up a value by dotted key (`forms.null_label`).
	pub fn get_value(&self, key: &str) -> Option<&Value> {
		let mut segments = key.split('.');
		let mut value = self.data.get(segments.next()?)?;
		for segment in segments {
			value = value.as_object()?.get(segment)?;
		}
		Some(value)
	}

	/// Deserialize the value at a dotted key.
	///
	/// # Errors
	///
	/// [`SettingsError::MissingValue`] when the key is not defined and
	/// [`SettingsError::InvalidValue`] when it has the wrong shape.
	pub fn get<T: DeserializeOwned>(&self, key: &str) -> SettingsResult<T> {
		let value = self
			.get_value(key)
			.ok_or_else(|| SettingsError::MissingValue(key.to_string()))?;
		serde_json::from_value(value.clone()).or_else(|err| {
			// Environment scalars are parsed eagerly; retry numbers and
			// booleans as the text they were written as.
			let retried = match value {
				Value::Bool(_) | Value::Number(_) => {
					serde_json::from_value(Value::String(value.to_string())).ok()
				}
				_ => None,
			};
			retried.ok_or_else(|| SettingsError::InvalidValue {
				key: key.to_string(),
				reason: err.to_string(),
			})
		})
	}

	pub fn contains(&self, key: &str) -> bool {
		self.get_value(key).is_some()
	}

	pub fn data(&self) -> &IndexMap<String, Value> {
		&self.data
	}

	/// Deserialize the whole tree into `T`.
	pub fn into_typed<T: DeserializeOwned>(self) -> SettingsResult<T> {
		let value = Value::Object(self.data.into_iter().collect());
		Ok(serde_json::from_value(value)?)
	}

	/// Deserialize into the framework [`Settings`].
	pub fn into_settings(self) -> SettingsResult<Settings> {
		self.into_typed()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sources::{DefaultSource, EnvSource};
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_higher_priority_wins_regardless_of_order() {
		// Arrange
		let builder = SettingsBuilder::new()
			.add_source(EnvSource::new().with_vars([("TRELLIS_DEBUG", "true")]))
			.add_source(DefaultSource::new().with_value("debug", json!(false)));

		// Act
		let merged = builder.build().unwrap();

		// Assert
		assert!(merged.get::<bool>("debug").unwrap());
	}

	#[rstest]
	fn test_equal_priority_later_source_wins() {
		let merged = SettingsBuilder::new()
			.add_source(DefaultSource::new().with_value("name", json!("first")))
			.add_source(DefaultSource::new().with_value("name", json!("second")))
			.build()
			.unwrap();

		assert_eq!(merged.get::<String>("name").unwrap(), "second");
	}

	#[rstest]
	fn test_lookup_errors() {
		let merged = SettingsBuilder::new()
			.add_source(DefaultSource::new().with_value("router", json!({ "max_pattern_length": "big" })))
			.build()
			.unwrap();

		assert!(matches!(
			merged.get::<u32>("router.other"),
			Err(SettingsError::MissingValue(key)) if key == "router.other"
		));
		assert!(matches!(
			merged.get::<u32>("router.max_pattern_length"),
			Err(SettingsError::InvalidValue { .. })
		));
		assert!(merged.contains("router"));
		assert!(!merged.contains("router.max_pattern_length.deeper"));
	}

	#[rstest]
	fn test_numeric_env_value_reads_as_text_or_number() {
		// Arrange
		let merged = SettingsBuilder::new()
			.add_source(EnvSource::new().with_vars([
				("TRELLIS_FORMS__ID_PREFIX", "2024"),
				("TRELLIS_ROUTER__MAX_PATTERN_LENGTH", "64"),
			]))
			.build()
			.unwrap();

		// Act
		let prefix = merged.get::<String>("forms.id_prefix").unwrap();
		let limit = merged.get::<usize>("router.max_pattern_length").unwrap();

		// Assert
		assert_eq!(prefix, "2024");
		assert_eq!(limit, 64);
	}
}
