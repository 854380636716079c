//! # Bingo Engine
//!
//! A multi-game bingo coordination engine: card sales, number calling,
//! server-side win evaluation and claim arbitration across a sequence of
//! prize stages.
//!
//! ## Architecture
//!
//! A game moves through five stages:
//!
//! - **Lobby**: cards are on sale, nothing has been called
//! - **Single**: first prize tier, any one complete line wins
//! - **Double**: two complete lines on the same card
//! - **Full**: every cell on the card marked
//! - **Ended**: terminal, the game is read-only
//!
//! Claims are never trusted: the engine re-evaluates the card against the
//! called numbers before recording a claim, and an administrator approves or
//! denies it. Stage progression is a separate administrator action.
//!
//! ## Core Modules
//!
//! - [`game`]: Game state, rules, win evaluation and projections
//! - [`session`]: Per-game actors and the game registry
//! - [`store`]: Snapshot persistence
//!
//! ## Example
//!
//! ```
//! use bingo_engine::{GameConfig, GameState, Stage};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut game = GameState::new("demo".to_string(), GameConfig::default());
//!
//! game.buy("alice", 2, &mut rng).unwrap();
//! assert_eq!(game.start().unwrap(), Stage::Single);
//! game.roll(&mut rng).unwrap();
//! assert_eq!(game.called().len(), 1);
//! ```

/// Core game state and rules.
pub mod game;

/// Per-game actors and the game registry.
pub mod session;

/// Snapshot persistence backends.
pub mod store;

pub use game::{
    CallOutcome, Card, Claim, ClaimDecision, ClaimSource, ClaimStatus, ErrorKind, Evaluation,
    GameConfig, GameError, GameId, GameInfo, GameProjection, GameResult, GameState, GameSummary,
    GameUpdate, OwnerCards, OwnerSummary, Payouts, Stage,
};
pub use session::{GameHandle, GameManager};
pub use store::{GameStore, JsonFileStore, MemoryStore, StoreError};
