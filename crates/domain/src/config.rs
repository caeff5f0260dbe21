//! Configuration structures
//!
//! Every field has a default so an empty file (or no file at all) yields a
//! working configuration. Loading lives in `toggldeck-infra::config`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_API_MAX_ATTEMPTS, DEFAULT_API_TIMEOUT_SECS,
    DEFAULT_CREATED_WITH, DEFAULT_POLL_FREQUENCY_SECS, DEFAULT_TICK_MILLIS,
};

/// Root plugin configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub api: ApiConfig,
    pub refresh: RefreshConfig,
    pub logging: LoggingConfig,
}

/// Remote time-tracking API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Total attempts per request (initial try + retries)
    pub max_attempts: usize,
    /// Value sent as `created_with` when starting entries
    pub created_with: String,
}

impl ApiConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_API_TIMEOUT_SECS,
            max_attempts: DEFAULT_API_MAX_ATTEMPTS,
            created_with: DEFAULT_CREATED_WITH.to_string(),
        }
    }
}

/// Refresh loop cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Visual refresh tick
    pub tick_millis: u64,
    /// Poll frequency used when a button does not request one
    pub default_poll_seconds: u64,
}

impl RefreshConfig {
    /// Refresh loop tick.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }

    /// Poll frequency for buttons that set none.
    pub fn default_poll(&self) -> Duration {
        Duration::from_secs(self.default_poll_seconds.max(1))
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            tick_millis: DEFAULT_TICK_MILLIS,
            default_poll_seconds: DEFAULT_POLL_FREQUENCY_SECS,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `toggldeck_core=debug`
    pub level: String,
    pub format: LogFormat,
    /// Directory for rolling log files; stderr when unset
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Pretty, directory: None }
    }
}
