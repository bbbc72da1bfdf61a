//! Integration tests for response normalization

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use stonks_poller::quote::{normalize, round_price, FetchError, Interval};

const INTRADAY: &str = include_str!("../fixtures/intraday_5min.json");

#[test]
fn test_fixture_sorted_strictly_ascending() {
    let series = normalize(INTRADAY, Interval::FiveMinutes).unwrap();

    assert_eq!(series.candles.len(), 4);
    assert!(series.candles.windows(2).all(|w| w[0].time < w[1].time));

    let first = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(15, 45, 0)
        .unwrap();
    assert_eq!(series.candles[0].time, first);
}

#[test]
fn test_fixture_rounding_and_partial_candle() {
    let series = normalize(INTRADAY, Interval::FiveMinutes).unwrap();

    // 185.4150 and 185.6050 sit exactly on the midpoint
    assert_eq!(series.candles[0].close, Some(dec!(185.42)));
    assert_eq!(series.candles[2].close, Some(dec!(185.61)));

    let partial = &series.candles[1];
    assert_eq!(partial.high, None);
    assert_eq!(partial.open, Some(dec!(185.41)));
    assert_eq!(partial.low, Some(dec!(185.29)));
    assert_eq!(partial.close, Some(dec!(185.35)));

    let latest = series.latest().unwrap();
    assert_eq!(latest.close, Some(dec!(185.64)));
    assert_eq!(latest.volume, Some(2104231));
    assert_eq!(series.meta.time_zone.as_deref(), Some("US/Eastern"));
}

#[test]
fn test_fixture_rounding_is_idempotent() {
    let series = normalize(INTRADAY, Interval::FiveMinutes).unwrap();
    for candle in &series.candles {
        for price in [candle.open, candle.high, candle.low, candle.close]
            .into_iter()
            .flatten()
        {
            assert_eq!(round_price(price), price);
        }
    }
}

#[test]
fn test_fixture_for_other_interval_is_invalid() {
    let result = normalize(INTRADAY, Interval::OneMinute);
    match result {
        Err(FetchError::InvalidFormat { key, notice }) => {
            assert_eq!(key, "Time Series (1min)");
            assert!(notice.is_none());
        }
        other => panic!("expected InvalidFormat, got {:?}", other),
    }
}

#[test]
fn test_two_candle_ordering_and_half_up() {
    let body = r#"{
        "Time Series (5min)": {
            "2024-01-01T09:30:00": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "101.005"},
            "2024-01-01T09:25:00": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "100.00"}
        }
    }"#;

    let series = normalize(body, Interval::FiveMinutes).unwrap();
    assert_eq!(series.candles[0].time.format("%H:%M").to_string(), "09:25");
    assert_eq!(series.candles[1].time.format("%H:%M").to_string(), "09:30");
    assert_eq!(series.candles[0].close, Some(dec!(100.00)));
    assert_eq!(series.candles[1].close, Some(dec!(101.01)));
}

#[test]
fn test_rate_limit_payload() {
    let result = normalize(
        include_str!("../fixtures/rate_limited.json"),
        Interval::FiveMinutes,
    );
    let err = result.unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(err.kind(), "invalid_format");
}
