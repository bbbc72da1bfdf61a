//! Fixed-delay quote poller
//!
//! One task, one in-flight request. The next poll is scheduled only after
//! the previous attempt finishes, so requests never overlap. A failed poll
//! leaves the last good state in place and the loop carries on.

use super::subscribers::{Subscribers, Subscription, SubscriptionId};
use super::{NormalizedUpdate, QuoteSnapshot, QuoteState};
use crate::config::QuoteConfig;
use crate::quote::{normalize, AlphaVantageClient, FetchError, QuoteSource};
use crate::telemetry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

/// Per-subscriber channel capacity
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 16;

/// Polls one symbol and publishes normalized snapshots
pub struct QuotePoller {
    config: QuoteConfig,
    source: Arc<dyn QuoteSource>,
    state: RwLock<QuoteState>,
    subscribers: Subscribers,
    // Serializes manual polls with the background loop
    in_flight: Mutex<()>,
}

impl QuotePoller {
    /// Create a poller over any quote source
    pub fn new(config: QuoteConfig, source: Arc<dyn QuoteSource>) -> Self {
        Self::with_buffer(config, source, DEFAULT_SUBSCRIBER_BUFFER)
    }

    /// Create a poller with a custom per-subscriber buffer
    pub fn with_buffer(config: QuoteConfig, source: Arc<dyn QuoteSource>, buffer: usize) -> Self {
        Self {
            config,
            source,
            state: RwLock::new(QuoteState::default()),
            subscribers: Subscribers::new(buffer),
            in_flight: Mutex::new(()),
        }
    }

    /// Create a poller backed by the Alpha Vantage HTTP client
    pub fn from_config(config: QuoteConfig) -> Result<Self, FetchError> {
        let client = AlphaVantageClient::from_quote_config(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Run one fetch-normalize-publish cycle
    ///
    /// On error nothing is mutated and nothing is published.
    pub async fn poll_once(&self) -> Result<NormalizedUpdate, FetchError> {
        let _guard = self.in_flight.lock().await;

        let started = Instant::now();
        let result = self.fetch_and_apply().await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        telemetry::record_poll(outcome, started.elapsed());

        result
    }

    async fn fetch_and_apply(&self) -> Result<NormalizedUpdate, FetchError> {
        let interval = self.config.interval;
        let body = self
            .source
            .fetch_intraday(&self.config.symbol, interval)
            .await?;
        let normalized = normalize(&body, interval)?;

        // No await between taking the write lock and building the snapshot,
        // so a cancelled poll either commits fully or not at all
        let (update, snapshot) = {
            let mut state = self.state.write().await;
            let update = state
                .apply(normalized)
                .ok_or_else(|| FetchError::InvalidFormat {
                    key: interval.series_key(),
                    notice: None,
                })?;
            (update, QuoteSnapshot::from_state(&self.config.symbol, &state))
        };

        telemetry::record_update(update.price, update.series.len());
        self.subscribers.publish(&snapshot);

        Ok(update)
    }

    /// Register a consumer of snapshots
    pub fn subscribe(&self) -> Subscription {
        self.subscribers.add()
    }

    /// Remove a consumer; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Copy of the current state
    pub async fn state(&self) -> QuoteState {
        self.state.read().await.clone()
    }

    /// Current state shaped as a published snapshot
    pub async fn snapshot(&self) -> QuoteSnapshot {
        let state = self.state.read().await;
        QuoteSnapshot::from_state(&self.config.symbol, &state)
    }

    /// Spawn the polling loop
    ///
    /// The first poll runs immediately; after each attempt the loop sleeps
    /// for the configured poll interval.
    pub fn start(self: Arc<Self>) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let period = self.config.poll_interval();

        let task = tokio::spawn(async move {
            self.run_loop(period, shutdown_rx).await;
        });

        PollerHandle {
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }

    async fn run_loop(&self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            symbol = %self.config.symbol,
            interval = %self.config.interval,
            period_secs = period.as_secs_f64(),
            "Quote poller started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                result = self.poll_once() => self.log_outcome(&result),
            }

            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = tokio::time::sleep(period) => {}
            }
        }

        tracing::info!(symbol = %self.config.symbol, "Quote poller stopped");
    }

    fn log_outcome(&self, result: &Result<NormalizedUpdate, FetchError>) {
        match result {
            Ok(update) => {
                tracing::info!(
                    symbol = %self.config.symbol,
                    price = ?update.price,
                    prev_price = ?update.prev_price,
                    direction = %update.direction(),
                    price_time = %update.price_time,
                    candles = update.series.len(),
                    "Quote updated"
                );
            }
            Err(e) => {
                tracing::warn!(
                    symbol = %self.config.symbol,
                    error = %e,
                    kind = e.kind(),
                    rate_limited = e.is_rate_limited(),
                    "Poll failed, keeping last known state"
                );
            }
        }
    }
}

/// Owner of a running poll loop
///
/// Dropping the handle aborts the loop; `stop` shuts it down and waits.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Cancel the pending timer (or in-flight poll) and wait for the loop to exit
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "Quote poller task failed");
                }
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
