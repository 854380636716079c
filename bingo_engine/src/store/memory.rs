//! In-memory store.

use super::{GameStore, StoreResult, validate_game_id};
use crate::game::{GameId, GameState};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keeps snapshots in a map; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: RwLock<HashMap<GameId, GameState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored games
    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }

    pub async fn get(&self, game_id: &str) -> Option<GameState> {
        self.games.read().await.get(game_id).cloned()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn save(&self, state: &GameState) -> StoreResult<()> {
        validate_game_id(state.game_id())?;
        self.games
            .write()
            .await
            .insert(state.game_id().to_string(), state.clone());
        Ok(())
    }

    async fn load_all(&self) -> StoreResult<Vec<GameState>> {
        Ok(self.games.read().await.values().cloned().collect())
    }

    async fn delete(&self, game_id: &str) -> StoreResult<()> {
        self.games.write().await.remove(game_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;

    #[tokio::test]
    async fn test_save_replaces_snapshot() {
        let store = MemoryStore::new();
        let mut game = GameState::new("g1".to_string(), GameConfig::default());
        store.save(&game).await.unwrap();

        game.start().unwrap();
        store.save(&game).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert!(store.get("g1").await.unwrap().is_started());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = MemoryStore::new();
        store.delete("nope").await.unwrap();
        assert!(store.is_empty().await);
    }
}
