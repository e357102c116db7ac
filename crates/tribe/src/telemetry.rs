//! Tracing subscriber setup for host applications.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LoggingSection};

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, or by `filter` when `RUST_LOG` is
/// unset. Returns `false` if a subscriber was already installed.
pub fn init_tracing(filter: &str) -> bool {
    init(filter, LogFormat::Text)
}

/// Like [`init_tracing`], with the filter and format taken from the `logging` config section.
pub fn init_from_config(logging: &LoggingSection) -> bool {
    init(&logging.filter, logging.format)
}

fn init(filter: &str, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let builder = fmt().with_env_filter(filter).with_target(false);
    match format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}
