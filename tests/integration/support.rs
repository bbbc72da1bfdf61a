//! Scripted quote source for driving the poller without a network

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use stonks_poller::quote::{FetchError, Interval, QuoteSource};

/// Replays queued responses in order; an exhausted script answers `{}`
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<String, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_body(&self, body: impl Into<String>) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(body.into()));
        self
    }

    pub fn push_error(&self, error: FetchError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    async fn fetch_intraday(&self, _symbol: &str, _interval: Interval) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("{}".to_string()))
    }
}

/// Never answers; every fetch stays pending until it is dropped
#[derive(Default)]
pub struct HangingSource {
    calls: AtomicUsize,
}

impl HangingSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for HangingSource {
    async fn fetch_intraday(&self, _symbol: &str, _interval: Interval) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

/// Answers `{}` after a fixed delay and records peak concurrency
pub struct SlowSource {
    delay: Duration,
    calls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl SlowSource {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most fetches ever running at once
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for SlowSource {
    async fn fetch_intraday(&self, _symbol: &str, _interval: Interval) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok("{}".to_string())
    }
}

/// A 5min response whose latest candle, at `time`, closes at `close`
pub fn body_with_close(time: &str, close: &str) -> String {
    format!(
        r#"{{
            "Time Series (5min)": {{
                "2024-01-02 09:25:00": {{
                    "1. open": "100.00", "2. high": "100.00",
                    "3. low": "100.00", "4. close": "100.00"
                }},
                "{time}": {{
                    "1. open": "{close}", "2. high": "{close}",
                    "3. low": "{close}", "4. close": "{close}"
                }}
            }}
        }}"#
    )
}
