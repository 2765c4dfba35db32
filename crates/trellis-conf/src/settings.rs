//! Typed framework settings.

use crate::builder::SettingsBuilder;
use crate::error::SettingsResult;
use crate::sources::{DefaultSource, EnvSource, TomlFileSource};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Settings read by the application facade.
///
/// Every field has a default, so an empty source tree deserializes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	#[serde(deserialize_with = "deserialize_flag")]
	pub debug: bool,
	pub logging: LoggingSettings,
	pub forms: FormSettings,
	pub router: RouterSettings,
}

impl Settings {
	/// Defaults, then `path` if it exists, then `TRELLIS_*` variables.
	///
	/// # Errors
	///
	/// Unreadable or malformed files and values of the wrong type.
	pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
		SettingsBuilder::new()
			.add_source(DefaultSource::new())
			.add_source(TomlFileSource::new(path.as_ref()))
			.add_source(EnvSource::new())
			.build()?
			.into_settings()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// An `EnvFilter` directive such as `info` or `trellis_urls=trace`.
	#[serde(deserialize_with = "deserialize_text")]
	pub level: String,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
	/// Prepended to every form id in rendered element ids.
	#[serde(deserialize_with = "deserialize_text")]
	pub id_prefix: String,
	/// Label of the empty select option.
	#[serde(deserialize_with = "deserialize_text")]
	pub null_label: String,
}

impl Default for FormSettings {
	fn default() -> Self {
		Self {
			id_prefix: String::new(),
			null_label: "--------".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Longest accepted route pattern, in bytes.
	pub max_pattern_length: usize,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			max_pattern_length: 1024,
		}
	}
}

/// Accept `true`/`false`, `1`/`0` and the words `yes`, `no`, `on`, `off`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Flag {
		Bool(bool),
		Int(i64),
		Text(String),
	}

	match Flag::deserialize(deserializer)? {
		Flag::Bool(flag) => Ok(flag),
		Flag::Int(number) => Ok(number != 0),
		Flag::Text(text) => match text.trim().to_lowercase().as_str() {
			"true" | "1" | "yes" | "on" => Ok(true),
			"false" | "0" | "no" | "off" | "" => Ok(false),
			other => Err(serde::de::Error::custom(format!(
				"expected a boolean, got '{}'",
				other
			))),
		},
	}
}

/// Accept strings as well as numbers and booleans, which environment
/// variables such as `TRELLIS_FORMS__NULL_LABEL=0` arrive as.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Text {
		Text(String),
		Bool(bool),
		Number(serde_json::Number),
	}

	Ok(match Text::deserialize(deserializer)? {
		Text::Text(text) => text,
		Text::Bool(flag) => flag.to_string(),
		Text::Number(number) => number.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_empty_tree_uses_defaults() {
		let settings: Settings = serde_json::from_value(json!({})).unwrap();

		assert_eq!(settings, Settings::default());
		assert_eq!(settings.logging.level, "info");
		assert_eq!(settings.forms.null_label, "--------");
		assert_eq!(settings.router.max_pattern_length, 1024);
	}

	#[rstest]
	#[case(json!(true), true)]
	#[case(json!(0), false)]
	#[case(json!(1), true)]
	#[case(json!("yes"), true)]
	#[case(json!("Off"), false)]
	fn test_debug_flag_forms(#[case] value: serde_json::Value, #[case] expected: bool) {
		let settings: Settings = serde_json::from_value(json!({ "debug": value })).unwrap();

		assert_eq!(settings.debug, expected);
	}

	#[rstest]
	fn test_debug_flag_rejects_other_words() {
		let result: Result<Settings, _> = serde_json::from_value(json!({ "debug": "maybe" }));

		assert!(result.is_err());
	}

	#[rstest]
	#[case(json!("(none)"), "(none)")]
	#[case(json!(0), "0")]
	#[case(json!(true), "true")]
	fn test_text_fields_accept_scalars(#[case] value: serde_json::Value, #[case] expected: &str) {
		let settings: Settings =
			serde_json::from_value(json!({ "forms": { "null_label": value } })).unwrap();

		assert_eq!(settings.forms.null_label, expected);
	}

	#[rstest]
	fn test_text_fields_reject_tables() {
		let result: Result<Settings, _> =
			serde_json::from_value(json!({ "logging": { "level": { "nested": 1 } } }));

		assert!(result.is_err());
	}

	#[rstest]
	fn test_partial_section_keeps_other_defaults() {
		let settings: Settings =
			serde_json::from_value(json!({ "forms": { "id_prefix": "app-" } })).unwrap();

		assert_eq!(settings.forms.id_prefix, "app-");
		assert_eq!(settings.forms.null_label, "--------");
	}
}
