//! Configuration sources for layered settings
//!
//! Each source yields a JSON object. Sources are merged in priority order
//! (environment variables > config files > defaults).

use crate::error::{SettingsError, SettingsResult};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

/// Prefix of the environment variables read by default.
pub const ENV_PREFIX: &str = "TRELLIS_";

/// Separator between nested keys in an environment variable name.
pub const ENV_NESTING_SEPARATOR: &str = "__";

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> SettingsResult<IndexMap<String, Value>>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Default values configuration source
#[derive(Debug, Clone, Default)]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a default value for a configuration key
	///
	/// # Examples
	///
	/// ```
	/// use trellis_conf::sources::{ConfigSource, DefaultSource};
	/// use serde_json::json;
	///
	/// let source = DefaultSource::new()
	///     .with_value("debug", json!(false))
	///     .with_value("router", json!({ "max_pattern_length": 512 }));
	///
	/// assert_eq!(source.load().unwrap()["debug"], json!(false));
	/// ```
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> SettingsResult<IndexMap<String, Value>> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// TOML file configuration source
///
/// A missing file loads as empty unless the source is marked
/// [`required`](TomlFileSource::required).
#[derive(Debug, Clone)]
pub struct TomlFileSource {
	path: PathBuf,
	required: bool,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}

	/// Fail with [`SettingsError::MissingFile`] when the file does not exist.
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> SettingsResult<IndexMap<String, Value>> {
		if !self.path.exists() {
			if self.required {
				return Err(SettingsError::MissingFile(self.path.clone()));
			}
			tracing::debug!(path = %self.path.display(), "settings file not found, skipping");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		match json_value {
			Value::Object(map) => Ok(map.into_iter().collect()),
			_ => Err(SettingsError::Parse("Expected table at root".to_string())),
		}
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Environment variable configuration source
///
/// Names are stripped of the prefix and lowercased; `__` separates nested
/// keys, so `TRELLIS_FORMS__NULL_LABEL` sets `forms.null_label`. Values that
/// parse as JSON numbers or booleans keep that type, anything else is a
/// string.
#[derive(Debug, Clone)]
pub struct EnvSource {
	prefix: String,
	vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
	pub fn new() -> Self {
		Self {
			prefix: ENV_PREFIX.to_string(),
			vars: None,
		}
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	/// Read from `vars` instead of the process environment.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_conf::sources::{ConfigSource, EnvSource};
	/// use serde_json::json;
	///
	/// let source = EnvSource::new().with_vars([
	///     ("TRELLIS_DEBUG", "true"),
	///     ("TRELLIS_ROUTER__MAX_PATTERN_LENGTH", "256"),
	///     ("HOME", "/root"),
	/// ]);
	/// let config = source.load().unwrap();
	///
	/// assert_eq!(config["debug"], json!(true));
	/// assert_eq!(config["router"], json!({ "max_pattern_length": 256 }));
	/// assert!(!config.contains_key("home"));
	/// ```
	pub fn with_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.vars = Some(
			vars.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		);
		self
	}

	fn vars(&self) -> Vec<(String, String)> {
		match &self.vars {
			Some(vars) => vars.clone(),
			None => std::env::vars().collect(),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> SettingsResult<IndexMap<String, Value>> {
		let mut config = IndexMap::new();

		for (key, value) in self.vars() {
			let Some(name) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			let path: Vec<String> = name
				.split(ENV_NESTING_SEPARATOR)
				.map(str::to_lowercase)
				.collect();
			if path.iter().any(String::is_empty) {
				tracing::warn!(variable = %key, "ignoring malformed settings variable");
				continue;
			}
			insert_path(&mut config, &path, parse_scalar(&value));
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

fn parse_scalar(value: &str) -> Value {
	match serde_json::from_str::<Value>(value.trim()) {
		Ok(parsed @ (Value::Bool(_) | Value::Number(_))) => parsed,
		_ => Value::String(value.to_string()),
	}
}

fn insert_path(config: &mut IndexMap<String, Value>, path: &[String], value: Value) {
	let Some((first, rest)) = path.split_first() else {
		return;
	};
	let nested = rest.iter().rev().fold(value, |inner, key| {
		let mut map = Map::new();
		map.insert(key.clone(), inner);
		Value::Object(map)
	});
	merge_value(config.entry(first.clone()).or_insert(Value::Null), nested);
}

/// Merge `incoming` into `target`: objects merge key by key, anything else
/// replaces the target.
pub(crate) fn merge_value(target: &mut Value, incoming: Value) {
	match (target, incoming) {
		(Value::Object(target), Value::Object(incoming)) => {
			for (key, value) in incoming {
				merge_value(target.entry(key).or_insert(Value::Null), value);
			}
		}
		(target, incoming) => *target = incoming,
	}
}
