//! Bingo game engine - game state and rules.
//!
//! This module holds the pure, synchronous part of the engine:
//! - Game configuration and card generation
//! - Call sequencing and win evaluation
//! - Claim arbitration and stage progression
//! - Read-only projections for polling clients
//!
//! Nothing here does I/O. Concurrency is layered on top by [`crate::session`].

pub mod calls;
pub mod card;
pub mod claims;
pub mod config;
pub mod errors;
pub mod owners;
pub mod stage;
pub mod state;
pub mod views;
pub mod win;

pub use calls::CallOutcome;
pub use card::{Card, CardId};
pub use claims::{Claim, ClaimDecision, ClaimSource, ClaimStatus};
pub use config::{GameConfig, GameUpdate, MAX_CARDS_PER_PURCHASE};
pub use errors::{ErrorKind, GameError, GameResult};
pub use owners::{OwnerRecord, OwnerRegistry, OwnerSummary};
pub use stage::{Payouts, Stage};
pub use state::{GameId, GameState};
pub use views::{
    CardView, ClaimView, GameInfo, GameProjection, GameStats, GameSummary, OwnerCards,
};
pub use win::{Evaluation, Line, LineKind, evaluate, evaluate_card};
