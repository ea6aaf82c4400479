// Logging module - installs the tracing subscriber
// Logs go to stderr; stdout is reserved for queries and results

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log format style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human-readable output
    Pretty,
    /// Compact single-line format (default)
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level filter; `RUST_LOG` takes precedence when set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl LogConfig {
    /// Set log level filter
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    fn filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| anyhow!("invalid log level '{}': {}", self.level, e))
    }

    /// Install the global subscriber. Fails if one is already installed
    pub fn init(self) -> Result<()> {
        let env_filter = self.filter()?;
        let registry = tracing_subscriber::registry().with(env_filter);

        match self.format {
            LogFormat::Pretty => registry
                .with(fmt::layer().with_writer(std::io::stderr).pretty())
                .try_init()?,
            LogFormat::Compact => registry
                .with(fmt::layer().with_writer(std::io::stderr).compact())
                .try_init()?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_log_config_builders() {
        let config = LogConfig::default().with_level("debug").with_format(LogFormat::Pretty);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Pretty);

        let config = LogConfig::default().with_level("campus_explorer=info");
        assert_eq!(config.level, "campus_explorer=info");
    }
}
