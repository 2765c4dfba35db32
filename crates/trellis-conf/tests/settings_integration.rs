//! Integration tests for layered settings
//!
//! Defaults, a TOML file and environment variables merged into `Settings`.

use rstest::{fixture, rstest};
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use trellis_conf::{
	DefaultSource, EnvSource, Settings, SettingsBuilder, SettingsError, TomlFileSource,
};

/// Fixture providing a directory with a `trellis.toml`
#[fixture]
fn config_dir() -> TempDir {
	let dir = TempDir::new().unwrap();
	fs::write(
		dir.path().join("trellis.toml"),
		r#"
debug = true

[logging]
level = "warn"

[forms]
id_prefix = "file-"

[router]
max_pattern_length = 300
"#,
	)
	.unwrap();
	dir
}

#[rstest]
fn test_environment_overrides_file_and_defaults(config_dir: TempDir) {
	// Arrange
	let builder = SettingsBuilder::new()
		.add_source(EnvSource::new().with_vars([
			("TRELLIS_FORMS__ID_PREFIX", "env-"),
			("TRELLIS_ROUTER__MAX_PATTERN_LENGTH", "128"),
		]))
		.add_source(TomlFileSource::new(config_dir.path().join("trellis.toml")))
		.add_source(
			DefaultSource::new()
				.with_value("debug", json!(false))
				.with_value("forms", json!({ "null_label": "(pick one)" })),
		);

	// Act
	let settings = builder.build().unwrap().into_settings().unwrap();

	// Assert
	assert!(settings.debug);
	assert_eq!(settings.logging.level, "warn");
	assert_eq!(settings.forms.id_prefix, "env-");
	assert_eq!(settings.forms.null_label, "(pick one)");
	assert_eq!(settings.router.max_pattern_length, 128);
}

#[rstest]
#[case("TRELLIS_FORMS__NULL_LABEL", "0")]
#[case("TRELLIS_FORMS__ID_PREFIX", "2024")]
#[case("TRELLIS_LOGGING__LEVEL", "true")]
fn test_numeric_looking_env_strings_are_kept(#[case] variable: &str, #[case] value: &str) {
	// Arrange
	let builder = SettingsBuilder::new()
		.add_source(DefaultSource::new())
		.add_source(EnvSource::new().with_vars([(variable, value)]));

	// Act
	let settings = builder.build().unwrap().into_settings().unwrap();

	// Assert
	let actual = match variable {
		"TRELLIS_FORMS__NULL_LABEL" => &settings.forms.null_label,
		"TRELLIS_FORMS__ID_PREFIX" => &settings.forms.id_prefix,
		_ => &settings.logging.level,
	};
	assert_eq!(actual, value);
}

#[rstest]
fn test_missing_optional_file_gives_defaults() {
	// Arrange
	let dir = TempDir::new().unwrap();

	// Act
	let settings = SettingsBuilder::new()
		.add_source(TomlFileSource::new(dir.path().join("absent.toml")))
		.build()
		.unwrap()
		.into_settings()
		.unwrap();

	// Assert
	assert_eq!(settings, Settings::default());
}

#[rstest]
fn test_missing_required_file_fails() {
	// Arrange
	let dir = TempDir::new().unwrap();

	// Act
	let result = SettingsBuilder::new()
		.add_source(TomlFileSource::new(dir.path().join("absent.toml")).required())
		.build();

	// Assert
	assert!(matches!(result, Err(SettingsError::MissingFile(_))));
}

#[rstest]
fn test_wrongly_typed_value_fails_conversion() {
	// Arrange
	let merged = SettingsBuilder::new()
		.add_source(EnvSource::new().with_vars([("TRELLIS_ROUTER__MAX_PATTERN_LENGTH", "huge")]))
		.build()
		.unwrap();

	// Act
	let result = merged.into_settings();

	// Assert
	assert!(matches!(result, Err(SettingsError::Json(_))));
}

#[rstest]
fn test_settings_error_is_a_configuration_error() {
	// Arrange
	let err = SettingsError::MissingValue("forms.null_label".to_string());

	// Act
	let err: trellis_core::Error = err.into();

	// Assert
	assert_eq!(err.status_code(), 500);
	assert!(err.to_string().contains("forms.null_label"));
}
