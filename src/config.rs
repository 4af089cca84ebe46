//! Connection settings for the remote analytics server.

use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:9004";
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Where the analytics server lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub url: String,
    pub poll_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            poll_timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

impl ServerConfig {
    /// Reads `TABPY_URL`, `TABPY_POLL_TIMEOUT_SECS` and `TABPY_POLL_INTERVAL_SECS`
    /// from the process environment, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let secs = |key: &str, default: Duration| -> Result<Duration> {
            match lookup(key) {
                Some(raw) => {
                    let n: u64 = raw
                        .trim()
                        .parse()
                        .with_context(|| format!("{key} must be a whole number of seconds, got '{raw}'"))?;
                    Ok(Duration::from_secs(n))
                }
                None => Ok(default),
            }
        };

        Ok(Self {
            url: lookup("TABPY_URL").unwrap_or(defaults.url),
            poll_timeout: secs("TABPY_POLL_TIMEOUT_SECS", defaults.poll_timeout)?,
            poll_interval: secs("TABPY_POLL_INTERVAL_SECS", defaults.poll_interval)?,
        })
    }

    /// Server URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}
