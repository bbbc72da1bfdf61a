//! Quote data types

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Candle bucket width supported by the intraday endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interval {
    #[serde(rename = "1min")]
    OneMinute,
    #[default]
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "60min")]
    SixtyMinutes,
}

impl Interval {
    /// Provider string form, e.g. "5min"
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1min",
            Interval::FiveMinutes => "5min",
            Interval::FifteenMinutes => "15min",
            Interval::ThirtyMinutes => "30min",
            Interval::SixtyMinutes => "60min",
        }
    }

    /// Key of the time-series object in the provider response
    pub fn series_key(&self) -> String {
        format!("Time Series ({})", self.as_str())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount of history requested per poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputSize {
    /// Latest 100 data points
    #[default]
    Compact,
    /// Full intraday history
    Full,
}

impl OutputSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

/// One OHLC bucket
///
/// Each price is rounded to two decimals. A field the provider sent in an
/// unparsable form is `None`; the rest of the candle is still usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start, in the provider's time zone
    pub time: NaiveDateTime,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub open: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub high: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub low: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub close: Option<Decimal>,
    pub volume: Option<u64>,
}

/// Provider "Meta Data" block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesMeta {
    pub symbol: Option<String>,
    pub last_refreshed: Option<String>,
    pub time_zone: Option<String>,
}

/// Result of normalizing one provider response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSeries {
    /// Candles, strictly ascending by time
    pub candles: Vec<Candle>,
    pub meta: SeriesMeta,
}

impl NormalizedSeries {
    /// The most recent candle
    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }
}
