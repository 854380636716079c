//! HTTP server for the bingo game engine.
//!
//! Wraps [`bingo_engine::GameManager`] in an axum router with API key
//! authentication for hosts, rate-limited public claims, structured logging
//! and Prometheus metrics.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
