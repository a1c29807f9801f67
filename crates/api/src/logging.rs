//! Global logger setup.

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives that replace the
/// configured level, e.g. `RAQP_LOG=raqp_query=trace`.
pub const LOG_FILTER_ENV: &str = "RAQP_LOG";

/// Output format of log events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    HumanReadable,
    Json,
}

/// Builds the event filter: the directives in [`LOG_FILTER_ENV`] if set and
/// valid, else everything at `level` or above.
pub fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
    })
}

/// Installs the global `tracing` subscriber. Events go to stderr so that
/// stdout carries only responses.
///
/// Fails if a global subscriber is already installed.
pub fn configure_global_logger(
    level: Level,
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr);

    match format {
        LogFormat::HumanReadable => builder.with_target(false).compact().try_init(),
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
    }
}
