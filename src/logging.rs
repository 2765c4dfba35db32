//! Logging bootstrap.
//!
//! Library crates only emit `tracing` events; the application installs the
//! subscriber once at startup.

use std::sync::Once;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use trellis_conf::LoggingSettings;

static INIT: Once = Once::new();

/// Filter used when neither `RUST_LOG` nor the settings give a usable one.
const FALLBACK_DIRECTIVE: &str = "info";

/// Install a formatting subscriber filtered by `RUST_LOG`, falling back to
/// `settings.level`.
///
/// Only the first call has an effect. If another global subscriber is
/// already installed, it is left in place.
pub fn init(settings: &LoggingSettings) {
	INIT.call_once(|| {
		let filter = build_filter(settings);
		let installed = tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer())
			.try_init()
			.is_ok();
		if installed {
			tracing::debug!(level = %settings.level, "logging initialized");
		}
	});
}

fn build_filter(settings: &LoggingSettings) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| directive_filter(&settings.level))
}

fn directive_filter(level: &str) -> EnvFilter {
	EnvFilter::try_new(level).unwrap_or_else(|err| {
		eprintln!("invalid log level '{}': {}, using '{}'", level, err, FALLBACK_DIRECTIVE);
		EnvFilter::new(FALLBACK_DIRECTIVE)
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("debug", "debug")]
	#[case("trellis_urls=trace", "trellis_urls=trace")]
	#[case("trellis_urls=loud", FALLBACK_DIRECTIVE)]
	fn test_directive_filter(#[case] level: &str, #[case] expected: &str) {
		assert_eq!(
			directive_filter(level).to_string(),
			EnvFilter::new(expected).to_string()
		);
	}

	#[rstest]
	fn test_init_twice_is_harmless() {
		let settings = LoggingSettings::default();

		init(&settings);
		init(&settings);
	}
}
