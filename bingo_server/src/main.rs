//! Bingo game server.
//!
//! Each game runs as its own actor managed by the GameManager, with
//! snapshots kept in memory or persisted as JSON files.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Error;
use bingo_engine::{GameManager, GameStore, JsonFileStore, MemoryStore};
use bingo_server::{api, config::ServerConfig, logging, metrics};
use pico_args::Arguments;
use tracing::{info, warn};

const HELP: &str = "\
Run a bingo game server

USAGE:
  bingo_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --data-dir   PATH        Directory for game snapshots [default: env BINGO_DATA_DIR, in-memory when unset]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  BINGO_API_KEYS           Comma-separated admin API keys (required, 16+ chars each)
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  BINGO_DATA_DIR           Directory for game snapshots
  METRICS_BIND             Prometheus exporter address (e.g., 127.0.0.1:9090)
  PUBLIC_RATE_LIMIT        Public claims per owner and caller per window [default: 10]
  PUBLIC_RATE_WINDOW_SECS  Public claim window in seconds [default: 60]
  GAME_INBOX_CAPACITY      Queued commands per game [default: 100]
  RUST_LOG                 Log filter [default: info,hyper=warn]
";

struct Args {
    bind: Option<SocketAddr>,
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        data_dir: pargs.opt_value_from_str("--data-dir")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.data_dir)?;
    config.validate()?;

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind)
            .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;
        info!("Metrics exporter listening on {}", metrics_bind);
    }

    let store: Arc<dyn GameStore> = match &config.data_dir {
        Some(dir) => {
            let store = JsonFileStore::open(dir).await.map_err(|e| {
                anyhow::anyhow!("Failed to open data directory {}: {}", dir.display(), e)
            })?;
            info!("Persisting games to {}", dir.display());
            Arc::new(store)
        }
        None => {
            warn!("No data directory configured; games will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let game_manager =
        Arc::new(GameManager::new(store).with_inbox_capacity(config.inbox_capacity));

    let restored = game_manager
        .load_existing_games()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load saved games: {}", e))?;
    info!("Restored {} game(s)", restored);
    metrics::active_games(game_manager.active_game_count().await);

    let api_state = api::AppState::new(
        game_manager.clone(),
        config.api_keys.clone(),
        &config.rate_limit,
    );
    let app = api::create_router(api_state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");
    game_manager.shutdown().await;

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
