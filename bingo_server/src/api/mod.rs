//! HTTP API for the bingo server.
//!
//! Player clients poll game state and submit claims through public routes.
//! Hosts and overlays drive the game through admin routes, which require a
//! configured API key.
//!
//! # Modules
//!
//! - [`games`]: Game handlers (public and admin)
//! - [`middleware`]: API key check for admin routes
//! - [`rate_limiter`]: Per-owner limits on public claims
//! - [`request_id`]: Correlation IDs and request metrics
//! - [`error`]: Error responses
//!
//! # Endpoints Overview
//!
//! ## Public
//! - `GET /health` - Server health status
//! - `GET /bingo/{game_id}` - Game projection for polling
//! - `GET /bingo/{game_id}/card/{card_id}` - Single card
//! - `GET /bingo/{game_id}/owner/{owner}/cards` - Cards of a named owner
//! - `GET /bingo/owner-token/{token}` - Cards behind an owner token
//! - `POST /bingo/claim-public` - Player claim (rate limited)
//!
//! ## Admin (`X-API-Key` or `Authorization: Bearer`)
//! - `POST /bingo/create`, `GET /bingo/games`
//! - `PATCH /bingo/{game_id}`, `DELETE /bingo/{game_id}`
//! - `GET /bingo/{game_id}/owners`
//! - `POST /bingo/buy`, `/bingo/roll`, `/bingo/call`, `/bingo/mark`
//! - `POST /bingo/claim`, `/bingo/claim-approve`, `/bingo/claim-deny`
//! - `POST /bingo/start`, `/bingo/advance-stage`, `/bingo/end`
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bingo_engine::{GameManager, MemoryStore};
//! use bingo_server::api::{AppState, create_router};
//! use bingo_server::config::RateLimitConfig;
//! use std::sync::Arc;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let manager = Arc::new(GameManager::new(Arc::new(MemoryStore::new())));
//! let state = AppState::new(
//!     manager,
//!     vec!["change-me-to-a-long-key".to_string()],
//!     &RateLimitConfig::default(),
//! );
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod games;
pub mod middleware;
pub mod rate_limiter;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use bingo_engine::GameManager;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::RateLimitConfig;
use rate_limiter::KeyedRateLimiter;

/// State shared by all handlers. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub game_manager: Arc<GameManager>,
    /// Accepted admin API keys
    pub api_keys: Arc<Vec<String>>,
    /// Limits public claims per game and owner
    pub public_limiter: Arc<KeyedRateLimiter>,
}

impl AppState {
    pub fn new(
        game_manager: Arc<GameManager>,
        api_keys: Vec<String>,
        rate_limit: &RateLimitConfig,
    ) -> Self {
        Self {
            game_manager,
            api_keys: Arc::new(api_keys),
            public_limiter: Arc::new(KeyedRateLimiter::new(
                rate_limit.max_requests,
                rate_limit.window,
            )),
        }
    }
}

/// Build the full router with public and admin routes.
///
/// Admin routes are wrapped in [`middleware::api_key_middleware`]. Every
/// route gets a request ID and permissive CORS.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/bingo/{game_id}", get(games::get_game))
        .route("/bingo/{game_id}/card/{card_id}", get(games::get_card))
        .route(
            "/bingo/{game_id}/owner/{owner}/cards",
            get(games::get_owner_cards),
        )
        .route("/bingo/owner-token/{token}", get(games::get_owner_by_token))
        .route("/bingo/claim-public", post(games::claim_public));

    let admin_routes = Router::new()
        .route("/bingo/create", post(games::create_game))
        .route("/bingo/games", get(games::list_games))
        .route(
            "/bingo/{game_id}",
            axum::routing::patch(games::update_game).delete(games::delete_game),
        )
        .route("/bingo/{game_id}/owners", get(games::list_owners))
        .route("/bingo/buy", post(games::buy))
        .route("/bingo/roll", post(games::roll))
        .route("/bingo/call", post(games::call))
        .route("/bingo/mark", post(games::mark))
        .route("/bingo/claim", post(games::claim_admin))
        .route("/bingo/claim-approve", post(games::claim_approve))
        .route("/bingo/claim-deny", post(games::claim_deny))
        .route("/bingo/start", post(games::start))
        .route("/bingo/advance-stage", post(games::advance_stage))
        .route("/bingo/end", post(games::end))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::api_key_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check for monitoring and load balancers.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","version":"0.1.0","games":{"total":2,"active":1},"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let total = state.game_manager.game_count().await;
    let active = state.game_manager.active_game_count().await;

    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "games": {
            "total": total,
            "active": active,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
