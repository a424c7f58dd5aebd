// SPDX-License-Identifier: MIT

//! Poll policy configuration
//!
//! A policy applies identically to every condition in a wait set. It can be
//! built in code or read from the `[wait]` table of a TOML file:
//!
//! ```toml
//! [wait]
//! poll_interval = "5s"
//! timeout = "2m"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default delay between polls of a single condition
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Default per-condition deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors from invalid or unreadable wait configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
    #[error("timeout ({timeout:?}) must be at least the poll interval ({poll_interval:?})")]
    TimeoutBelowPollInterval {
        timeout: Duration,
        poll_interval: Duration,
    },
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Poll interval and timeout shared by every condition in a wait set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollPolicy {
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    wait: PollPolicy,
}

impl PollPolicy {
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that every condition can be polled at least once before its deadline
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.timeout < self.poll_interval {
            return Err(ConfigError::TimeoutBelowPollInterval {
                timeout: self.timeout,
                poll_interval: self.poll_interval,
            });
        }
        Ok(())
    }

    /// Parse the `[wait]` table; missing keys keep their defaults.
    ///
    /// Values are not validated here so later overrides can still repair
    /// them. Call [`PollPolicy::validate`] on the final policy.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(s)?;
        Ok(file.wait)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
