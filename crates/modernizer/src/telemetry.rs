//! Process-wide tracing setup.
//!
//! Library code only emits through `tracing` and `log`; installing a
//! subscriber is left to the embedding binary or test.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// Installs a global subscriber filtered by `RUST_LOG`, or `default_filter`
/// when the variable is unset or invalid. Records from the `log` crate are
/// forwarded into it.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(default_filter: &str, format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let installed = match format {
        LogFormat::Plain => {
            let subscriber = Registry::default()
                .with(filter)
                .with(fmt::layer().with_target(true));
            tracing::subscriber::set_global_default(subscriber).is_ok()
        }
        LogFormat::Json => {
            let subscriber = Registry::default()
                .with(filter)
                .with(fmt::layer().json().with_current_span(true));
            tracing::subscriber::set_global_default(subscriber).is_ok()
        }
    };

    if installed {
        // Worker threads log through `log`
        if let Err(e) = tracing_log::LogTracer::init() {
            tracing::debug!("log bridge not installed: {}", e);
        }
    }
    installed
}
