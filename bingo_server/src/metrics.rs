//! Prometheus metrics for monitoring the bingo server.
//!
//! Metrics are exposed in Prometheus text format by a separate HTTP listener
//! when `METRICS_BIND` is configured. Without an installed exporter every
//! recording call is a no-op.
//!
//! # Metrics Categories
//!
//! - **HTTP Metrics**: Request counts and durations by route and status
//! - **Game Metrics**: Active games, cards sold, numbers called
//! - **Claim Metrics**: Claims submitted and resolved
//! - **Security Metrics**: Rejected API keys, rate limit hits
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bingo_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/bingo/roll", 200);
//! metrics::numbers_called_total();
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Game Metrics
// ============================================================================

/// Set current active games count.
pub fn active_games(count: usize) {
    metrics::gauge!("bingo_active_games").set(count as f64);
}

/// Add sold cards to the running total.
pub fn cards_sold_total(count: usize) {
    metrics::counter!("bingo_cards_sold_total").increment(count as u64);
}

/// Increment numbers called counter.
pub fn numbers_called_total() {
    metrics::counter!("bingo_numbers_called_total").increment(1);
}

// ============================================================================
// Claim Metrics
// ============================================================================

/// Increment claims submitted counter.
pub fn claims_submitted_total(source: &str) {
    metrics::counter!("bingo_claims_submitted_total",
        "source" => source.to_string()
    )
    .increment(1);
}

/// Increment claims resolved counter.
pub fn claims_resolved_total(outcome: &str) {
    metrics::counter!("bingo_claims_resolved_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

// ============================================================================
// Security Metrics
// ============================================================================

/// Increment rejected API key counter.
pub fn api_key_rejections_total() {
    metrics::counter!("api_key_rejections_total").increment(1);
}

/// Increment rate limit hits counter.
pub fn rate_limit_hits_total(endpoint: &str) {
    metrics::counter!("rate_limit_hits_total",
        "endpoint" => endpoint.to_string()
    )
    .increment(1);
}
