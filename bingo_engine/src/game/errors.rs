//! Game error types.

use super::stage::Stage;
use serde::Serialize;
use thiserror::Error;

/// Coarse error classes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidState,
    Validation,
}

/// Game errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// No game with this ID
    #[error("Game not found: {0}")]
    GameNotFound(String),

    /// Card missing, or owned by someone other than the claimant
    #[error("Card not found")]
    UnknownCard,

    /// Owner token does not match any owner
    #[error("Owner token not recognised")]
    UnknownToken,

    /// No claim has ever been raised for this card
    #[error("No claim found for card {0}")]
    ClaimNotFound(String),

    /// Purchase would push the owner above the per-player cap
    #[error("Player already has {have} card(s) (max {max}); cannot buy {requested} more")]
    LimitExceeded {
        have: usize,
        requested: usize,
        max: usize,
    },

    /// Number already present in the called sequence
    #[error("Number {0} already called")]
    AlreadyCalled(u32),

    /// Number outside the game's pool
    #[error("Number must be between 1 and {max} (got {number})")]
    OutOfRange { number: u32, max: u32 },

    /// A claim for this card is still waiting for a decision
    #[error("A claim for this card is already pending")]
    DuplicatePending,

    /// The card was denied at this stage and may not claim it again
    #[error("Claim for this card was denied at the {0} stage")]
    ClaimDenied(Stage),

    /// The card already won this stage
    #[error("Card already won the {0} stage")]
    AlreadyAwarded(Stage),

    /// Start requested twice
    #[error("Game has already started")]
    AlreadyStarted,

    /// Operation requires a started game
    #[error("Game has not started")]
    NotStarted,

    /// Game ended, or card sales are closed
    #[error("Game is closed")]
    GameClosed,

    /// Card does not satisfy the win condition of the current stage
    #[error("Card does not have a winning pattern for the {0} stage")]
    StageMismatch(Stage),

    /// Every number in the pool has been called
    #[error("All numbers have been called")]
    PoolExhausted,

    /// Malformed input
    #[error("{0}")]
    Validation(String),

    /// The game's actor is gone (deleted mid-request)
    #[error("Game is no longer available")]
    Unavailable,
}

impl GameError {
    /// Error class used for transport status mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::GameNotFound(_)
            | GameError::UnknownCard
            | GameError::UnknownToken
            | GameError::ClaimNotFound(_)
            | GameError::Unavailable => ErrorKind::NotFound,
            GameError::LimitExceeded { .. }
            | GameError::AlreadyCalled(_)
            | GameError::DuplicatePending
            | GameError::ClaimDenied(_)
            | GameError::AlreadyAwarded(_) => ErrorKind::Conflict,
            GameError::AlreadyStarted
            | GameError::NotStarted
            | GameError::GameClosed
            | GameError::StageMismatch(_)
            | GameError::PoolExhausted => ErrorKind::InvalidState,
            GameError::OutOfRange { .. } | GameError::Validation(_) => ErrorKind::Validation,
        }
    }
}

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;
