//! Game persistence.
//!
//! The session layer writes a full snapshot of a game after every accepted
//! mutation and reads all snapshots back on startup. Two backends exist:
//! [`MemoryStore`] for tests and ephemeral servers, and [`JsonFileStore`]
//! which keeps one JSON document per game in a directory.

mod errors;
mod file;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::game::GameState;
use async_trait::async_trait;

/// Storage backend for game snapshots
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Insert or replace the snapshot for `state.game_id()`
    async fn save(&self, state: &GameState) -> StoreResult<()>;

    /// Load every stored game
    async fn load_all(&self) -> StoreResult<Vec<GameState>>;

    /// Remove a game. Removing a game that is not stored succeeds.
    async fn delete(&self, game_id: &str) -> StoreResult<()>;
}

/// Game IDs become file names, so only a conservative alphabet is accepted
pub(crate) fn validate_game_id(game_id: &str) -> StoreResult<()> {
    let valid = !game_id.is_empty()
        && game_id.len() <= 64
        && game_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(game_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_game_id() {
        assert!(validate_game_id("3f2a9c0d41e84b7f").is_ok());
        assert!(validate_game_id("game_1-a").is_ok());
        assert!(validate_game_id("").is_err());
        assert!(validate_game_id("../etc/passwd").is_err());
        assert!(validate_game_id("a/b").is_err());
        assert!(validate_game_id(&"x".repeat(65)).is_err());
    }
}
