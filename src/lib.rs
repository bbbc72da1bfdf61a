//! stonks-poller: intraday stock-quote poller
//!
//! This library provides the core components for:
//! - Fetching intraday candles from Alpha Vantage
//! - Normalizing raw responses into an ordered, rounded candle series
//! - Tracking the latest price and its direction between polls
//! - Fixed-delay polling with subscribe/unsubscribe and start/stop
//! - Logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod poller;
pub mod quote;
pub mod telemetry;
