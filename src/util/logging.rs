//! Diagnostic logging for vervar
//!
//! The verification report owns stdout, so every diagnostic is written to
//! stderr through `tracing`. Only events from the `vervar` target are raised
//! to the configured level; `RUST_LOG` directives are applied on top.
//!
//! ```no_run
//! use vervar::util::logging::{init_logging, LogFormat, LoggingConfig};
//! use tracing::Level;
//!
//! init_logging(LoggingConfig::with_level(Level::DEBUG).with_format(LogFormat::Json));
//! tracing::debug!(plugin = "dotEnv", files = 3, "Collected files");
//! ```

use std::env;
use std::io;
use std::str::FromStr;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static INIT: Once = Once::new();

/// Default log level when no flag asks for one
pub const LOG_LEVEL_ENV_VAR: &str = "VERVAR_LOG_LEVEL";

/// Set to `true` for one JSON object per log line
pub const LOG_JSON_ENV_VAR: &str = "VERVAR_LOG_JSON";

const FILTER_TARGET: &str = "vervar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl LogFormat {
    /// Reads `VERVAR_LOG_JSON`; anything but a parseable `true` means plain
    pub fn from_env() -> Self {
        match env::var(LOG_JSON_ENV_VAR).ok().and_then(|v| v.parse::<bool>().ok()) {
            Some(true) => LogFormat::Json,
            _ => LogFormat::Plain,
        }
    }
}

/// Settings for the stderr subscriber
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,

    /// Show the emitting module, e.g. `vervar::pipeline::runner`
    pub include_target: bool,

    /// Show source file and line
    pub include_location: bool,

    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    /// Warnings only: a clean run prints nothing but the report
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Plain,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_location(mut self, include_location: bool) -> Self {
        self.include_location = include_location;
        self
    }

    /// Resolves the level from the global CLI flags.
    ///
    /// Precedence: `--log-level`, `--verbose`, `--quiet`, `VERVAR_LOG_LEVEL`,
    /// then the default. The format always comes from `VERVAR_LOG_JSON`.
    pub fn from_args(log_level: Option<&str>, verbose: bool, quiet: bool) -> Self {
        let level = match (log_level, verbose, quiet) {
            (Some(requested), _, _) => parse_level(requested),
            (None, true, _) => Level::DEBUG,
            (None, false, true) => Level::ERROR,
            (None, false, false) => env::var(LOG_LEVEL_ENV_VAR)
                .map(|requested| parse_level(&requested))
                .unwrap_or(Level::WARN),
        };

        Self::with_level(level)
            .with_format(LogFormat::from_env())
            .with_location(level >= Level::DEBUG)
    }

    fn filter(&self) -> EnvFilter {
        let filter = EnvFilter::from_default_env();
        match format!("{}={}", FILTER_TARGET, self.level).parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        }
    }
}

/// Parses a level name or number as `tracing` does, falling back to WARN.
///
/// ```
/// use vervar::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("Debug"), Level::DEBUG);
/// assert_eq!(parse_level("loud"), Level::WARN);
/// ```
pub fn parse_level(requested: &str) -> Level {
    Level::from_str(requested.trim()).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level '{}', using warn. Valid levels: trace, debug, info, warn, error",
            requested
        );
        Level::WARN
    })
}

/// Installs the global subscriber; only the first call has an effect
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids);

        let layer = match config.format {
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Plain => layer.boxed(),
        };

        if let Err(e) = tracing_subscriber::registry()
            .with(layer.with_filter(config.filter()))
            .try_init()
        {
            eprintln!("Logging was already initialized: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use yare::parameterized;

    #[parameterized(
        lower = { "trace", Level::TRACE },
        mixed = { "Info", Level::INFO },
        upper = { "ERROR", Level::ERROR },
        padded = { " debug ", Level::DEBUG },
        unknown = { "loud", Level::WARN },
        empty = { "", Level::WARN },
    )]
    fn test_parse_level(requested: &str, expected: Level) {
        assert_eq!(parse_level(requested), expected);
    }

    #[test]
    fn test_default_is_quiet_plain() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.format, LogFormat::Plain);
        assert!(!config.include_location);
    }

    #[test]
    fn test_builders() {
        let config = LoggingConfig::with_level(Level::INFO)
            .with_format(LogFormat::Json)
            .with_location(true);
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.include_location);
    }

    #[test]
    #[serial]
    fn test_from_args_precedence() {
        env::set_var(LOG_LEVEL_ENV_VAR, "info");

        assert_eq!(LoggingConfig::from_args(Some("trace"), true, false).level, Level::TRACE);
        assert_eq!(LoggingConfig::from_args(None, true, false).level, Level::DEBUG);
        assert_eq!(LoggingConfig::from_args(None, false, true).level, Level::ERROR);
        assert_eq!(LoggingConfig::from_args(None, false, false).level, Level::INFO);

        env::remove_var(LOG_LEVEL_ENV_VAR);
        assert_eq!(LoggingConfig::from_args(None, false, false).level, Level::WARN);
    }

    #[test]
    #[serial]
    fn test_verbose_shows_locations() {
        env::remove_var(LOG_LEVEL_ENV_VAR);
        assert!(LoggingConfig::from_args(None, true, false).include_location);
        assert!(!LoggingConfig::from_args(None, false, false).include_location);
    }

    #[test]
    #[serial]
    fn test_format_from_env() {
        env::set_var(LOG_JSON_ENV_VAR, "true");
        assert_eq!(LoggingConfig::from_args(None, false, false).format, LogFormat::Json);

        env::set_var(LOG_JSON_ENV_VAR, "yes");
        assert_eq!(LogFormat::from_env(), LogFormat::Plain);

        env::remove_var(LOG_JSON_ENV_VAR);
        assert_eq!(LogFormat::from_env(), LogFormat::Plain);
    }
}
