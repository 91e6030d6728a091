//! Log subscriber setup for the `ethos` binary

use crate::error::EthosError;
use tracing_subscriber::EnvFilter;

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Filter from `RUST_LOG`, falling back to `default_level`
///
/// # Errors
/// `EthosError::Logging` when neither yields a valid directive.
pub fn env_filter(default_level: &str) -> Result<EnvFilter, EthosError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level)
            .map_err(|e| EthosError::Logging(format!("log level '{default_level}': {e}"))),
    }
}

/// Install the global subscriber. Logs go to stderr so they never mix with
/// the interactive prompt on stdout.
///
/// # Errors
/// `EthosError::Logging` for an invalid filter or when a subscriber is
/// already installed.
pub fn init_logging(default_level: &str, format: LogFormat) -> Result<(), EthosError> {
    let filter = env_filter(default_level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Pretty => builder.with_target(false).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| EthosError::Logging(e.to_string()))
}
