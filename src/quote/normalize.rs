//! Response normalization
//!
//! Turns a raw intraday response into an ordered candle series. This is the
//! pure half of a poll: no I/O, no state.

use super::{Candle, FetchError, Interval, NormalizedSeries, SeriesMeta};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

const OPEN_FIELD: &str = "1. open";
const HIGH_FIELD: &str = "2. high";
const LOW_FIELD: &str = "3. low";
const CLOSE_FIELD: &str = "4. close";
const VOLUME_FIELD: &str = "5. volume";

const META_KEY: &str = "Meta Data";
const META_SYMBOL: &str = "2. Symbol";
const META_LAST_REFRESHED: &str = "3. Last Refreshed";
const META_TIME_ZONE: &str = "6. Time Zone";

/// Top-level keys the provider uses for notices instead of data
const NOTICE_KEYS: [&str; 3] = ["Note", "Information", "Error Message"];

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse and normalize a raw response body
pub fn normalize(body: &str, interval: Interval) -> Result<NormalizedSeries, FetchError> {
    let value: Value = serde_json::from_str(body)?;
    normalize_value(&value, interval)
}

/// Normalize an already-parsed response
pub fn normalize_value(value: &Value, interval: Interval) -> Result<NormalizedSeries, FetchError> {
    let key = interval.series_key();

    let series = value
        .get(&key)
        .and_then(Value::as_object)
        .ok_or_else(|| FetchError::InvalidFormat {
            key: key.clone(),
            notice: provider_notice(value),
        })?;

    // Keyed by parsed time: sorts ascending and collapses duplicate stamps
    let mut candles = BTreeMap::new();
    for (raw_time, fields) in series {
        match parse_timestamp(raw_time) {
            Some(time) => {
                candles.insert(time, parse_candle(time, fields));
            }
            None => {
                tracing::warn!(timestamp = %raw_time, "Skipping unparsable timestamp");
            }
        }
    }

    if candles.is_empty() {
        return Err(FetchError::InvalidFormat {
            key,
            notice: provider_notice(value),
        });
    }

    Ok(NormalizedSeries {
        candles: candles.into_values().collect(),
        meta: parse_meta(value.get(META_KEY)),
    })
}

/// Round a price to two decimals, halves away from zero
pub fn round_price(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a provider price field, `None` if missing or unparsable
pub fn parse_price(value: Option<&Value>) -> Option<Decimal> {
    let decimal = match value? {
        Value::String(s) => parse_decimal(s.trim())?,
        Value::Number(n) => parse_decimal(&n.to_string())?,
        _ => return None,
    };
    Some(round_price(decimal))
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    // Decimal::from_str tolerates digit separators; provider numbers never carry them
    if s.is_empty() || s.contains('_') {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn parse_volume(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// Parse a time-series key into a timestamp
///
/// Intraday keys look like `2024-01-01 09:30:00`; date-only keys map to
/// midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_candle(time: NaiveDateTime, fields: &Value) -> Candle {
    let fields = fields.as_object();
    let field = |name: &str| fields.and_then(|f| f.get(name));

    Candle {
        time,
        open: parse_price(field(OPEN_FIELD)),
        high: parse_price(field(HIGH_FIELD)),
        low: parse_price(field(LOW_FIELD)),
        close: parse_price(field(CLOSE_FIELD)),
        volume: parse_volume(field(VOLUME_FIELD)),
    }
}

fn parse_meta(meta: Option<&Value>) -> SeriesMeta {
    let text = |name: &str| {
        meta.and_then(|m| m.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    SeriesMeta {
        symbol: text(META_SYMBOL),
        last_refreshed: text(META_LAST_REFRESHED),
        time_zone: text(META_TIME_ZONE),
    }
}

fn provider_notice(value: &Value) -> Option<String> {
    NOTICE_KEYS
        .iter()
        .find_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}
