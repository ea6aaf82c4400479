// Client configuration
// Defaults, overridable from the environment and then from CLI flags

use anyhow::{anyhow, Result};
use std::time::Duration;

/// Where queries are sent when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:4321/query";

/// Environment variable overriding the endpoint URL
pub const ENDPOINT_VAR: &str = "CAMPUS_EXPLORER_ENDPOINT";
/// Environment variable setting a request timeout in seconds
pub const TIMEOUT_VAR: &str = "CAMPUS_EXPLORER_TIMEOUT_SECS";

/// Settings for [`QuerySender`](super::QuerySender)
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub endpoint: String,
    /// `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_VAR).filter(|e| !e.trim().is_empty()) {
            config.endpoint = endpoint;
        }

        if let Some(secs) = lookup(TIMEOUT_VAR) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| anyhow!("invalid {}='{}': {}", TIMEOUT_VAR, secs, e))?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
