//! Configuration types for stonks-poller

use crate::quote::{Interval, OutputSize, ALPHA_VANTAGE_URL};
use crate::telemetry::LogFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `quote.api_key`
pub const API_KEY_ENV: &str = "QUOTE_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub quote: QuoteConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Quote polling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteConfig {
    /// Provider base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Ticker symbol to poll
    pub symbol: String,

    /// Candle width
    #[serde(default)]
    pub interval: Interval,

    /// Provider API key
    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub output_size: OutputSize,

    /// Delay between the end of one poll and the start of the next
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// HTTP timeout; the transport default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    ALPHA_VANTAGE_URL.to_string()
}
fn default_poll_interval_secs() -> u64 {
    10
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            symbol: "AAPL".to_string(),
            interval: Interval::FiveMinutes,
            api_key: "demo".to_string(),
            output_size: OutputSize::Compact,
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: None,
        }
    }
}

impl QuoteConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// API key with all but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        let visible = self.api_key.len().saturating_sub(4);
        self.api_key
            .char_indices()
            .map(|(i, c)| if i < visible { '*' } else { c })
            .collect()
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; exporter disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("quote.symbol must not be empty")]
    EmptySymbol,
    #[error("quote.api_key is empty and QUOTE_API_KEY is not set")]
    MissingApiKey,
    #[error("quote.poll_interval_secs must be greater than zero")]
    ZeroPollInterval,
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.quote.api_key = key;
        }
    }

    /// Reject configurations the poller cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quote.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if self.quote.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.quote.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}
