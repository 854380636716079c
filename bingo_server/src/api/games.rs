//! Bingo game API handlers.
//!
//! Public endpoints serve the polling projection, cards and owner views, and
//! accept player claims. Every other endpoint is admin-only and sits behind
//! the API key middleware.
//!
//! # Examples
//!
//! Poll a game:
//! ```bash
//! curl http://localhost:8080/bingo/3f2a9c0d41e84b7f9d1c2b3a4e5f6071
//! ```
//!
//! Roll the next number:
//! ```bash
//! curl -X POST http://localhost:8080/bingo/roll \
//!   -H "X-API-Key: $KEY" \
//!   -H "Content-Type: application/json" \
//!   -d '{"game_id": "3f2a9c0d41e84b7f9d1c2b3a4e5f6071"}'
//! ```

use axum::{
    Json,
    extract::{ConnectInfo, Path, State, rejection::JsonRejection},
    http::Extensions,
};
use bingo_engine::{
    CallOutcome, ClaimSource, GameConfig, GameError, GameHandle, GameInfo, GameProjection,
    GameSummary, GameUpdate, OwnerCards, OwnerSummary, Stage,
    game::{CardView, ClaimView},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::{
    AppState,
    error::{ApiError, ApiResult},
    rate_limiter::RateDecision,
};
use crate::{logging::log_game_command, metrics};

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GameIdRequest {
    pub game_id: String,
}

#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    pub game_id: String,
    pub owner_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: usize,
}

fn default_quantity() -> usize {
    1
}

/// `number` omitted means roll a random one
#[derive(Debug, Deserialize)]
pub struct CallRequest {
    pub game_id: String,
    pub number: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CardRequest {
    pub game_id: String,
    pub card_id: String,
}

/// Player claim; the owner is named directly or through their token
#[derive(Debug, Deserialize)]
pub struct PublicClaimRequest {
    pub game_id: String,
    pub card_id: String,
    pub owner_name: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MarkRequest {
    pub game_id: String,
    pub card_id: String,
    pub row: usize,
    pub col: usize,
}

// ============================================================================
// Response bodies
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub ok: bool,
    pub game: GameInfo,
}

#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub ok: bool,
    pub card: CardView,
}

#[derive(Debug, Serialize)]
pub struct OwnerCardsResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub view: OwnerCards,
}

#[derive(Debug, Serialize)]
pub struct OwnersResponse {
    pub ok: bool,
    pub owners: Vec<OwnerSummary>,
}

#[derive(Debug, Serialize)]
pub struct BuyResponse {
    pub ok: bool,
    pub cards: Vec<CardView>,
    /// Token for the owner's card page
    pub owner_token: Option<String>,
    pub pot: i64,
}

#[derive(Debug, Serialize)]
pub struct CallResponse {
    pub ok: bool,
    pub number: u32,
    pub called: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct StageResponse {
    pub ok: bool,
    pub message: String,
    pub stage: Stage,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub ok: bool,
    pub message: String,
    pub claim: ClaimView,
}

#[derive(Debug, Serialize)]
pub struct ClaimDecisionResponse {
    pub ok: bool,
    pub changed: bool,
    pub message: String,
    pub claim: ClaimView,
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub ok: bool,
    pub games: Vec<GameSummary>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub ok: bool,
    pub message: String,
}

// ============================================================================
// Public endpoints
// ============================================================================

/// Game projection polled by player and overlay clients.
///
/// Returns `{active, game, stats: {cards, players}}`.
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> ApiResult<Json<GameProjection>> {
    let snapshot = state.game_manager.snapshot(&game_id).await?;
    Ok(Json(snapshot.projection()))
}

pub async fn get_card(
    State(state): State<AppState>,
    Path((game_id, card_id)): Path<(String, String)>,
) -> ApiResult<Json<CardResponse>> {
    let snapshot = state.game_manager.snapshot(&game_id).await?;
    let card = snapshot.card(&card_id).ok_or(GameError::UnknownCard)?;
    Ok(Json(CardResponse {
        ok: true,
        card: CardView::from(card),
    }))
}

/// Cards held by a named owner. An owner without cards gets an empty list.
pub async fn get_owner_cards(
    State(state): State<AppState>,
    Path((game_id, owner)): Path<(String, String)>,
) -> ApiResult<Json<OwnerCardsResponse>> {
    let snapshot = state.game_manager.snapshot(&game_id).await?;
    Ok(Json(OwnerCardsResponse {
        ok: true,
        view: snapshot.owner_view(owner.trim()),
    }))
}

/// Cards for the owner behind an opaque token
pub async fn get_owner_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<OwnerCardsResponse>> {
    let (handle, owner) = state.game_manager.find_owner_by_token(&token).await?;
    Ok(Json(OwnerCardsResponse {
        ok: true,
        view: handle.snapshot().owner_view(&owner),
    }))
}

/// Player claim submission.
///
/// The card must belong to the named owner before any rate budget is spent.
/// Token-bearing claims are limited per owner; name-only claims are limited
/// per owner and client address, so a caller who only knows a player's name
/// cannot exhaust that player's token budget.
pub async fn claim_public(
    State(state): State<AppState>,
    extensions: Extensions,
    payload: Result<Json<PublicClaimRequest>, JsonRejection>,
) -> ApiResult<Json<ClaimResponse>> {
    let Json(req) = payload?;
    let handle = state.game_manager.handle(&req.game_id).await?;
    let snapshot = handle.snapshot();

    let (owner, caller) = match (&req.token, &req.owner_name) {
        (Some(token), _) => {
            let owner = snapshot
                .owner_for_token(token)
                .ok_or(GameError::UnknownToken)?;
            (owner.to_string(), "token".to_string())
        }
        (None, Some(name)) if !name.trim().is_empty() => {
            (name.trim().to_string(), client_addr(&extensions))
        }
        _ => {
            return Err(ApiError::BadRequest(
                "owner_name or token is required".to_string(),
            ));
        }
    };

    snapshot
        .card(&req.card_id)
        .filter(|card| card.owner_name == owner)
        .ok_or(GameError::UnknownCard)?;

    let key = format!("{}:{}:{}", req.game_id, owner, caller);
    if let RateDecision::Limited { retry_after } = state.public_limiter.check(&key).await {
        metrics::rate_limit_hits_total("/bingo/claim-public");
        return Err(ApiError::RateLimited { retry_after });
    }

    submit_claim(&handle, &req.card_id, &owner, ClaimSource::Public).await
}

/// Peer address from the connection, when the server was built with connect info
fn client_addr(extensions: &Extensions) -> String {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

// ============================================================================
// Admin endpoints
// ============================================================================

pub async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<GameConfig>, JsonRejection>,
) -> ApiResult<Json<GameResponse>> {
    let Json(config) = payload?;
    let game = state.game_manager.create_game(config).await?;
    metrics::active_games(state.game_manager.active_game_count().await);

    Ok(Json(GameResponse {
        ok: true,
        game: game.info(),
    }))
}

pub async fn update_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    payload: Result<Json<GameUpdate>, JsonRejection>,
) -> ApiResult<Json<GameResponse>> {
    let Json(update) = payload?;
    let handle = state.game_manager.handle(&game_id).await?;
    logged("update", &handle, handle.update(update).await)?;

    Ok(Json(GameResponse {
        ok: true,
        game: handle.snapshot().info(),
    }))
}

pub async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.game_manager.delete_game(&game_id).await?;
    metrics::active_games(state.game_manager.active_game_count().await);

    Ok(Json(MessageResponse {
        ok: true,
        message: format!("Game {} deleted", game_id),
    }))
}

/// All games, newest first
pub async fn list_games(State(state): State<AppState>) -> Json<GamesResponse> {
    Json(GamesResponse {
        ok: true,
        games: state.game_manager.list_games().await,
    })
}

pub async fn list_owners(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> ApiResult<Json<OwnersResponse>> {
    let snapshot = state.game_manager.snapshot(&game_id).await?;
    Ok(Json(OwnersResponse {
        ok: true,
        owners: snapshot.owners_view(),
    }))
}

pub async fn buy(
    State(state): State<AppState>,
    payload: Result<Json<BuyRequest>, JsonRejection>,
) -> ApiResult<Json<BuyResponse>> {
    let Json(req) = payload?;
    let handle = state.game_manager.handle(&req.game_id).await?;
    let cards = logged("buy", &handle, handle.buy(&req.owner_name, req.quantity).await)?;
    metrics::cards_sold_total(cards.len());

    let snapshot = handle.snapshot();
    let owner_token = snapshot
        .owners()
        .get(req.owner_name.trim())
        .map(|o| o.token.clone());

    Ok(Json(BuyResponse {
        ok: true,
        cards: cards.iter().map(CardView::from).collect(),
        owner_token,
        pot: snapshot.pot(),
    }))
}

pub async fn roll(
    State(state): State<AppState>,
    payload: Result<Json<GameIdRequest>, JsonRejection>,
) -> ApiResult<Json<CallResponse>> {
    let Json(req) = payload?;
    let handle = state.game_manager.handle(&req.game_id).await?;
    let outcome = logged("roll", &handle, handle.roll().await)?;
    Ok(Json(called_response(outcome)))
}

/// Call a specific number, or roll when `number` is omitted
pub async fn call(
    State(state): State<AppState>,
    payload: Result<Json<CallRequest>, JsonRejection>,
) -> ApiResult<Json<CallResponse>> {
    let Json(req) = payload?;
    let handle = state.game_manager.handle(&req.game_id).await?;
    let result = match req.number {
        Some(number) => handle.call(number).await,
        None => handle.roll().await,
    };
    let outcome = logged("call", &handle, result)?;
    Ok(Json(called_response(outcome)))
}

pub async fn mark(
    State(state): State<AppState>,
    payload: Result<Json<MarkRequest>, JsonRejection>,
) -> ApiResult<Json<CardResponse>> {
    let Json(req) = payload?;
    let handle = state.game_manager.handle(&req.game_id).await?;
    logged(
        "mark",
        &handle,
        handle.mark_cell(&req.card_id, req.row, req.col).await,
    )?;

    let snapshot = handle.snapshot();
    let card = snapshot.card(&req.card_id).ok_or(GameError::UnknownCard)?;
    Ok(Json(CardResponse {
        ok: true,
        card: CardView::from(card),
    }))
}

/// Admin-raised claim; the owner is taken from the card
pub async fn claim_admin(
    State(state): State<AppState>,
    payload: Result<Json<CardRequest>, JsonRejection>,
) -> ApiResult<Json<ClaimResponse>> {
    let Json(req) = payload?;
    let handle = state.game_manager.handle(&req.game_id).await?;
    let owner = handle
        .snapshot()
        .card(&req.card_id)
        .map(|c| c.owner_name.clone())
        .ok_or(GameError::UnknownCard)?;

    submit_claim(&handle, &req.card_id, &owner, ClaimSource::Admin).await
}

pub async fn claim_approve(
    State(state): State<AppState>,
    payload: Result<Json<CardRequest>, JsonRejection>,
) -> ApiResult<Json<ClaimDecisionResponse>> {
    let Json(req) = payload?;
    let handle = state.game_manager.handle(&req.game_id).await?;
    let decision = logged(
        "claim_approve",
        &handle,
        handle.approve_claim(&req.card_id).await,
    )?;

    if decision.changed {
        metrics::claims_resolved_total("approved");
    }

    let message = if decision.changed {
        format!("Claim approved for {}", decision.claim.owner_name)
    } else {
        "Claim was already resolved".to_string()
    };

    Ok(Json(ClaimDecisionResponse {
        ok: true,
        changed: decision.changed,
        message,
        claim: ClaimView::from(&decision.claim),
    }))
}

pub async fn claim_deny(
    State(state): State<AppState>,
    payload: Result<Json<CardRequest>, JsonRejection>,
) -> ApiResult<Json<ClaimDecisionResponse>> {
    let Json(req) = payload?;
    let handle = state.game_manager.handle(&req.game_id).await?;
    let decision = logged(
        "claim_deny",
        &handle,
        handle.deny_claim(&req.card_id).await,
    )?;

    if decision.changed {
        metrics::claims_resolved_total("denied");
    }

    let message = if decision.changed {
        format!("Claim denied for {}", decision.claim.owner_name)
    } else {
        "Claim was already resolved".to_string()
    };

    Ok(Json(ClaimDecisionResponse {
        ok: true,
        changed: decision.changed,
        message,
        claim: ClaimView::from(&decision.claim),
    }))
}

pub async fn start(
    State(state): State<AppState>,
    payload: Result<Json<GameIdRequest>, JsonRejection>,
) -> ApiResult<Json<StageResponse>> {
    let Json(req) = payload?;
    let handle = state.game_manager.handle(&req.game_id).await?;
    let stage = logged("start", &handle, handle.start().await)?;

    Ok(Json(stage_response(
        stage,
        format!("Game started at stage {}", stage),
    )))
}

pub async fn advance_stage(
    State(state): State<AppState>,
    payload: Result<Json<GameIdRequest>, JsonRejection>,
) -> ApiResult<Json<StageResponse>> {
    let Json(req) = payload?;
    let handle = state.game_manager.handle(&req.game_id).await?;
    let stage = logged("advance_stage", &handle, handle.advance_stage().await)?;

    if stage == Stage::Ended {
        metrics::active_games(state.game_manager.active_game_count().await);
    }

    Ok(Json(stage_response(
        stage,
        format!("Stage advanced to {}", stage),
    )))
}

/// End the game; ending an ended game succeeds without change
pub async fn end(
    State(state): State<AppState>,
    payload: Result<Json<GameIdRequest>, JsonRejection>,
) -> ApiResult<Json<StageResponse>> {
    let Json(req) = payload?;
    let handle = state.game_manager.handle(&req.game_id).await?;
    let changed = logged("end", &handle, handle.end().await)?;
    metrics::active_games(state.game_manager.active_game_count().await);

    let message = if changed {
        "Game ended".to_string()
    } else {
        "Game had already ended".to_string()
    };
    Ok(Json(stage_response(Stage::Ended, message)))
}

// ============================================================================
// Helpers
// ============================================================================

async fn submit_claim(
    handle: &GameHandle,
    card_id: &str,
    owner: &str,
    source: ClaimSource,
) -> ApiResult<Json<ClaimResponse>> {
    let claim = logged(
        "claim",
        handle,
        handle.submit_claim(card_id, owner, source).await,
    )?;
    metrics::claims_submitted_total(&source.to_string());

    Ok(Json(ClaimResponse {
        ok: true,
        message: format!("Claim for the {} stage is pending review", claim.stage),
        claim: ClaimView::from(&claim),
    }))
}

/// Log a command outcome and convert its error for the response
fn logged<T>(command: &str, handle: &GameHandle, result: Result<T, GameError>) -> ApiResult<T> {
    match &result {
        Ok(_) => log_game_command(command, handle.game_id(), Ok(())),
        Err(e) => log_game_command(command, handle.game_id(), Err(&e.to_string())),
    }
    result.map_err(ApiError::from)
}

fn called_response(outcome: CallOutcome) -> CallResponse {
    metrics::numbers_called_total();
    CallResponse {
        ok: true,
        number: outcome.number,
        called: outcome.called,
    }
}

/// Built from the stage the command produced, not a later snapshot
fn stage_response(stage: Stage, message: String) -> StageResponse {
    StageResponse {
        ok: true,
        message,
        stage,
        active: stage != Stage::Ended,
    }
}
