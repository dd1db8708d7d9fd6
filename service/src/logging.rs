//! Terminal logging for the server process.

use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// HTTP client and server internals, shown only at `TRACE`.
const NOISY_DEPENDENCIES: &[&str] = &["hyper", "h2", "reqwest", "rustls", "tower", "axum"];

pub struct Logger;

impl Logger {
    /// Installs the global terminal logger at the configured level.
    ///
    /// Fails if a logger has already been installed in this process.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        let level = config.log_level_filter;

        TermLogger::init(
            level,
            Self::log_config(level),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )
    }

    fn log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder
            .set_time_format_rfc3339()
            .set_thread_level(LevelFilter::Off)
            .set_target_level(LevelFilter::Error);

        if Self::hides_dependencies(level) {
            for module in NOISY_DEPENDENCIES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }

    fn hides_dependencies(level: LevelFilter) -> bool {
        level < LevelFilter::Trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependencies_hidden_below_trace() {
        assert!(!Logger::hides_dependencies(LevelFilter::Trace));
        for level in [LevelFilter::Off, LevelFilter::Warn, LevelFilter::Debug] {
            assert!(Logger::hides_dependencies(level), "{level}");
        }
    }

    #[test]
    fn test_http_stack_is_treated_as_noisy() {
        for module in ["hyper", "reqwest", "axum"] {
            assert!(NOISY_DEPENDENCIES.contains(&module), "{module}");
        }
        assert!(!NOISY_DEPENDENCIES.contains(&"domain"));
    }

    #[test]
    fn test_log_config_builds_for_every_level() {
        for level in [LevelFilter::Off, LevelFilter::Info, LevelFilter::Trace] {
            let _config = Logger::log_config(level);
        }
    }

    #[test]
    fn test_second_init_is_rejected() {
        let config = Config::from_args(["meeting_summarizer_rs", "--log-level-filter", "WARN"]);

        let _ = Logger::init_logger(&config);
        assert!(Logger::init_logger(&config).is_err());
    }
}
