//! # Trellis Conf
//!
//! Layered settings: defaults, an optional TOML file and `TRELLIS_*`
//! environment variables, merged into a typed [`Settings`].
//!
//! ```
//! use trellis_conf::{DefaultSource, EnvSource, Settings, SettingsBuilder};
//! use serde_json::json;
//!
//! let settings: Settings = SettingsBuilder::new()
//!     .add_source(DefaultSource::new().with_value("debug", json!(false)))
//!     .add_source(EnvSource::new().with_vars([
//!         ("TRELLIS_DEBUG", "on"),
//!         ("TRELLIS_LOGGING__LEVEL", "debug"),
//!     ]))
//!     .build()
//!     .unwrap()
//!     .into_settings()
//!     .unwrap();
//!
//! assert!(settings.debug);
//! assert_eq!(settings.logging.level, "debug");
//! assert_eq!(settings.router.max_pattern_length, 1024);
//! ```

pub mod builder;
pub mod error;
pub mod settings;
pub mod sources;

pub use builder::{MergedSettings, SettingsBuilder};
pub use error::{SettingsError, SettingsResult};
pub use settings::{FormSettings, LoggingSettings, RouterSettings, Settings};
pub use sources::{ConfigSource, DefaultSource, ENV_PREFIX, EnvSource, TomlFileSource};
