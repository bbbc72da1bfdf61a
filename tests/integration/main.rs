//! Integration tests for stonks-poller

mod quote_test;
mod support;
