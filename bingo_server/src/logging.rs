//! Structured logging configuration.
//!
//! The engine logs through the `log` facade; the subscriber installed here
//! forwards those records into `tracing` alongside the server's own events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,hyper=warn";

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use bingo_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log security event with structured data
///
/// # Example
///
/// ```
/// use bingo_server::logging::log_security_event;
///
/// log_security_event("invalid_api_key", Some("/bingo/roll"), "Rejected admin request");
/// ```
pub fn log_security_event(event_type: &str, path: Option<&str>, message: &str) {
    tracing::warn!(
        event_type = event_type,
        path = path,
        "SECURITY: {}",
        message
    );
}

/// Log a completed game command with its outcome
pub fn log_game_command(command: &str, game_id: &str, outcome: Result<(), &str>) {
    match outcome {
        Ok(()) => tracing::info!(command = command, game_id = game_id, "Game command applied"),
        Err(reason) => tracing::info!(
            command = command,
            game_id = game_id,
            reason = reason,
            "Game command rejected"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_security_event() {
        // Just ensure it doesn't panic
        log_security_event("test_event", Some("/bingo/roll"), "Test message");
        log_security_event("test_event", None, "Test message");
    }

    #[test]
    fn test_log_game_command() {
        log_game_command("roll", "abc", Ok(()));
        log_game_command("roll", "abc", Err("Game has not started"));
    }
}
