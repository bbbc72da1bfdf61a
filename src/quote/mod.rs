//! Quote source module
//!
//! Fetches intraday candles for one symbol and normalizes them into an
//! ordered series.

mod alpha_vantage;
mod error;
mod normalize;
mod types;

pub use alpha_vantage::{AlphaVantageClient, AlphaVantageConfig, ALPHA_VANTAGE_URL};
pub use error::FetchError;
pub use normalize::{normalize, normalize_value, parse_price, parse_timestamp, round_price};
pub use types::{Candle, Interval, NormalizedSeries, OutputSize, SeriesMeta};

use async_trait::async_trait;

/// Trait for quote provider implementations
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the raw intraday response body for a symbol
    async fn fetch_intraday(&self, symbol: &str, interval: Interval) -> Result<String, FetchError>;
}
