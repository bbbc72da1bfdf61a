//! Alpha Vantage intraday client
//!
//! Issues `TIME_SERIES_INTRADAY` queries and hands the raw body back to the
//! normalizer. Rate limiting is signalled by the provider in the body, not
//! the status, so a 200 here says nothing about whether data came back.

use super::{FetchError, Interval, OutputSize, QuoteSource};
use crate::config::QuoteConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Alpha Vantage API base URL
pub const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co";

const INTRADAY_FUNCTION: &str = "TIME_SERIES_INTRADAY";

/// Configuration for the Alpha Vantage client
#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    /// Base URL, without the `/query` path
    pub base_url: String,
    pub api_key: String,
    pub output_size: OutputSize,
    /// Request timeout; transport default when `None`
    pub timeout: Option<Duration>,
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            base_url: ALPHA_VANTAGE_URL.to_string(),
            api_key: "demo".to_string(),
            output_size: OutputSize::Compact,
            timeout: None,
        }
    }
}

impl From<&QuoteConfig> for AlphaVantageConfig {
    fn from(config: &QuoteConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            output_size: config.output_size,
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// HTTP client for the Alpha Vantage query endpoint
pub struct AlphaVantageClient {
    config: AlphaVantageConfig,
    client: Client,
}

impl AlphaVantageClient {
    /// Create a client with custom configuration
    pub fn with_config(config: AlphaVantageConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Create a client from the quote section of the app config
    pub fn from_quote_config(config: &QuoteConfig) -> Result<Self, FetchError> {
        Self::with_config(AlphaVantageConfig::from(config))
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.config.base_url.trim_end_matches('/'))
    }

    fn query_params(&self, symbol: &str, interval: Interval) -> [(&'static str, String); 5] {
        [
            ("function", INTRADAY_FUNCTION.to_string()),
            ("symbol", symbol.to_string()),
            ("interval", interval.as_str().to_string()),
            ("apikey", self.config.api_key.clone()),
            ("outputsize", self.config.output_size.as_str().to_string()),
        ]
    }
}

#[async_trait]
impl QuoteSource for AlphaVantageClient {
    async fn fetch_intraday(&self, symbol: &str, interval: Interval) -> Result<String, FetchError> {
        let url = self.query_url();

        tracing::debug!(url = %url, symbol, interval = %interval, "Fetching intraday series");

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(symbol, interval))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}
