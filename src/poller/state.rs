//! Poller state and published snapshot types

use crate::quote::{Candle, NormalizedSeries, SeriesMeta};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sign of change between two successive latest-price observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    #[default]
    Flat,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Flat => "flat",
        };
        f.write_str(s)
    }
}

/// Compare the previous latest price with the current one
///
/// A missing side (first poll, or an unparsable close) is flat.
pub fn direction(prev: Option<Decimal>, curr: Option<Decimal>) -> Direction {
    match (prev, curr) {
        (Some(p), Some(c)) if p < c => Direction::Up,
        (Some(p), Some(c)) if p > c => Direction::Down,
        _ => Direction::Flat,
    }
}

/// Latest close, the close seen by the previous poll, and when it was set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceObservation {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub prev_price: Option<Decimal>,
    pub price_time: Option<NaiveDateTime>,
}

impl PriceObservation {
    /// Shift the current price into `prev_price` and record a new one
    pub fn observe(&mut self, price: Option<Decimal>, time: NaiveDateTime) {
        self.prev_price = self.price.take();
        self.price = price;
        self.price_time = Some(time);
    }

    pub fn direction(&self) -> Direction {
        direction(self.prev_price, self.price)
    }
}

/// Everything a successful poll replaces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteState {
    pub series: Vec<Candle>,
    pub observation: PriceObservation,
    pub meta: SeriesMeta,
    /// Successful polls since start
    pub updates: u64,
}

impl QuoteState {
    /// Replace the series wholesale and advance the observation
    ///
    /// Returns `None`, leaving the state untouched, when the series is empty.
    pub fn apply(&mut self, normalized: NormalizedSeries) -> Option<NormalizedUpdate> {
        let latest = normalized.latest()?;
        let (time, close) = (latest.time, latest.close);

        self.observation.observe(close, time);
        self.series = normalized.candles;
        self.meta = normalized.meta;
        self.updates += 1;

        Some(NormalizedUpdate {
            series: self.series.clone(),
            price: self.observation.price,
            prev_price: self.observation.prev_price,
            price_time: time,
        })
    }
}

/// Output of one successful poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUpdate {
    pub series: Vec<Candle>,
    pub price: Option<Decimal>,
    pub prev_price: Option<Decimal>,
    pub price_time: NaiveDateTime,
}

impl NormalizedUpdate {
    pub fn direction(&self) -> Direction {
        direction(self.prev_price, self.price)
    }
}

/// Value published to subscribers, shaped for a rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub series: Vec<Candle>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub prev_price: Option<Decimal>,
    pub price_time: Option<NaiveDateTime>,
    pub direction: Direction,
    pub meta: SeriesMeta,
}

impl QuoteSnapshot {
    pub fn from_state(symbol: &str, state: &QuoteState) -> Self {
        Self {
            symbol: symbol.to_string(),
            series: state.series.clone(),
            price: state.observation.price,
            prev_price: state.observation.prev_price,
            price_time: state.observation.price_time,
            direction: state.observation.direction(),
            meta: state.meta.clone(),
        }
    }
}
