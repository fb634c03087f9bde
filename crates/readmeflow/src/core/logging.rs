//! Logging infrastructure for flowchart generation
//!
//! Structured logging goes through the `tracing` crate. The library only emits
//! events; installing a subscriber is left to the embedding application, and
//! [`init_logging`] is the convenience used by the CLI and by tests.
//!
//! # Usage
//!
//! ```rust
//! use readmeflow::core::logging::init_logging;
//!
//! // Defaults: info level, compact format (ignored if already installed)
//! let _ = init_logging(None, None);
//!
//! // Explicit level and format
//! let _ = init_logging(Some("debug"), Some("pretty"));
//! ```
//!
//! # Environment Variables
//!
//! - `READMEFLOW_LOG_LEVEL`: log level or filter directive (e.g. `debug`,
//!   `readmeflow::flowchart::synthesizer=trace`)
//! - `READMEFLOW_LOG_FORMAT`: `compact`, `pretty` or `json`
//! - `RUST_LOG`: standard `tracing-subscriber` filter, consulted when
//!   `READMEFLOW_LOG_LEVEL` is unset
//!
//! Output is written to stderr so that graph JSON on stdout stays clean.

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Environment variable holding the log level
pub const LOG_LEVEL_ENV: &str = "READMEFLOW_LOG_LEVEL";

/// Environment variable holding the log format
pub const LOG_FORMAT_ENV: &str = "READMEFLOW_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact single-line format
    #[default]
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Resolved logging settings before a subscriber is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Filter directive handed to `EnvFilter`
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl LogSettings {
    /// Resolve settings from explicit arguments, then the environment, then defaults
    pub fn resolve(level: Option<&str>, format: Option<&str>) -> Result<Self, String> {
        let level = level
            .map(str::to_string)
            .or_else(|| std::env::var(LOG_LEVEL_ENV).ok())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string());

        let format = match format
            .map(str::to_string)
            .or_else(|| std::env::var(LOG_FORMAT_ENV).ok())
        {
            Some(name) => {
                LogFormat::from_str(&name).map_err(|e| format!("Invalid log format: {}", e))?
            }
            None => LogFormat::default(),
        };

        Ok(Self { level, format })
    }

    fn filter(&self) -> EnvFilter {
        if self.level == "off" {
            return EnvFilter::new("off");
        }
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the tracing subscriber with the given log level and format
///
/// # Arguments
///
/// * `level` - Optional level or filter directive. Falls back to
///   `READMEFLOW_LOG_LEVEL`, then `RUST_LOG`, then `info`. Unparseable
///   directives fall back to `info`.
/// * `format` - Optional format (compact|pretty|json). Falls back to
///   `READMEFLOW_LOG_FORMAT`, then `compact`.
///
/// # Returns
///
/// An error if the format is unknown or a global subscriber is already set.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = LogSettings::resolve(level, format)?;
    let filter = settings.filter();

    match settings.format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_level(true)
                        .with_file(false)
                        .with_line_number(false)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}
