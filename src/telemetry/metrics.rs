//! Poll metrics
//!
//! Recorded through the `metrics` facade; without an installed exporter the
//! calls are no-ops.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const POLLS_TOTAL: &str = "stonks_polls_total";
pub const POLL_LATENCY_MS: &str = "stonks_poll_latency_ms";
pub const LAST_PRICE: &str = "stonks_last_price";
pub const SERIES_LEN: &str = "stonks_series_len";

/// Count a finished poll and its latency
///
/// `outcome` is `"ok"` or a `FetchError::kind` label.
pub fn record_poll(outcome: &'static str, elapsed: Duration) {
    metrics::counter!(POLLS_TOTAL, "outcome" => outcome).increment(1);
    metrics::histogram!(POLL_LATENCY_MS).record(elapsed.as_secs_f64() * 1000.0);

    tracing::trace!(
        outcome,
        elapsed_ms = elapsed.as_millis() as u64,
        "Recorded poll"
    );
}

/// Record the state a successful poll produced
pub fn record_update(price: Option<Decimal>, series_len: usize) {
    if let Some(price) = price.and_then(|p| p.to_f64()) {
        metrics::gauge!(LAST_PRICE).set(price);
    }
    metrics::gauge!(SERIES_LEN).set(series_len as f64);
}

/// Serve Prometheus metrics on `0.0.0.0:port`
///
/// Must be called from within a tokio runtime.
pub fn init_metrics_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}
