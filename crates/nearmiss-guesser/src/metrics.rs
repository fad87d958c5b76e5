//! Prometheus metrics for the guess loop
//!
//! Only aggregate numbers are exported, never private keys.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use nearmiss_core::Strategy;

use crate::error::{GuesserError, Result};

pub fn record_guesses(count: u64) {
    if count > 0 {
        counter!("nearmiss_guesses_total").increment(count);
    }
}

pub fn set_best_match_length(length: usize) {
    gauge!("nearmiss_best_match_length").set(length as f64);
}

pub fn set_guess_rate(per_second: f64) {
    gauge!("nearmiss_guess_rate").set(per_second);
}

pub fn set_index_stats(strategy: Strategy, targets: usize, bytes: usize) {
    gauge!("nearmiss_targets", "strategy" => strategy.to_string()).set(targets as f64);
    gauge!("nearmiss_index_bytes", "strategy" => strategy.to_string()).set(bytes as f64);
}

/// Install the global recorder and serve `/metrics` on `port`
pub fn install_exporter(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| GuesserError::Metrics(e.to_string()))?;
    tracing::info!(%addr, "metrics endpoint listening");
    Ok(())
}
