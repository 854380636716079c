//! Game manager for spawning and managing game actors.

use super::actor::{DEFAULT_INBOX_CAPACITY, GameActor, GameHandle};
use crate::{
    game::{GameConfig, GameError, GameId, GameResult, GameState, GameSummary},
    store::{GameStore, StoreResult},
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Registry of live games, one actor per game
pub struct GameManager {
    /// Persistence backend shared by every actor
    store: Arc<dyn GameStore>,

    /// Active game handles
    games: Arc<RwLock<HashMap<GameId, GameHandle>>>,

    inbox_capacity: usize,
}

impl GameManager {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            store,
            games: Arc::new(RwLock::new(HashMap::new())),
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
        }
    }

    /// Set the per-game inbox capacity for games spawned from now on
    pub fn with_inbox_capacity(mut self, capacity: usize) -> Self {
        self.inbox_capacity = capacity.max(1);
        self
    }

    /// Load stored games and spawn an actor for each
    ///
    /// # Returns
    ///
    /// * `StoreResult<usize>` - Number of games loaded
    pub async fn load_existing_games(&self) -> StoreResult<usize> {
        let states = self.store.load_all().await?;
        let mut loaded_count = 0;

        for state in states {
            let game_id = state.game_id().to_string();
            if self.games.read().await.contains_key(&game_id) {
                log::warn!("Game {} already running, skipping stored copy", game_id);
                continue;
            }

            self.spawn(state).await;
            log::info!("Loaded and spawned existing game {}", game_id);
            loaded_count += 1;
        }

        Ok(loaded_count)
    }

    /// Create and spawn a new game
    ///
    /// # Returns
    ///
    /// * `GameResult<Arc<GameState>>` - Initial snapshot of the new game
    pub async fn create_game(&self, config: GameConfig) -> GameResult<Arc<GameState>> {
        config.validate().map_err(GameError::Validation)?;

        let game_id = Uuid::new_v4().simple().to_string();
        let state = GameState::new(game_id.clone(), config);

        if let Err(e) = self.store.save(&state).await {
            log::warn!("Game {}: failed to persist new game: {}", game_id, e);
        }

        let handle = self.spawn(state).await;
        log::info!("Created and spawned game {}", game_id);

        Ok(handle.snapshot())
    }

    async fn spawn(&self, state: GameState) -> GameHandle {
        let game_id = state.game_id().to_string();
        let (actor, handle) = GameActor::new(state, self.store.clone(), self.inbox_capacity);

        let mut games = self.games.write().await;
        games.insert(game_id, handle.clone());
        drop(games);

        tokio::spawn(async move {
            actor.run().await;
        });

        handle
    }

    /// Get a game handle
    pub async fn get_game(&self, game_id: &str) -> Option<GameHandle> {
        let games = self.games.read().await;
        games.get(game_id).cloned()
    }

    /// Get a game handle or `GameNotFound`
    pub async fn handle(&self, game_id: &str) -> GameResult<GameHandle> {
        self.get_game(game_id)
            .await
            .ok_or_else(|| GameError::GameNotFound(game_id.to_string()))
    }

    /// Latest snapshot of a game
    pub async fn snapshot(&self, game_id: &str) -> GameResult<Arc<GameState>> {
        Ok(self.handle(game_id).await?.snapshot())
    }

    /// All games, newest first
    pub async fn list_games(&self) -> Vec<GameSummary> {
        let games = self.games.read().await;
        let mut snapshots: Vec<Arc<GameState>> = games.values().map(GameHandle::snapshot).collect();
        drop(games);

        snapshots.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.game_id().cmp(b.game_id()))
        });
        snapshots.iter().map(|s| s.summary()).collect()
    }

    /// Stop a game's actor and remove it from the registry and the store
    pub async fn delete_game(&self, game_id: &str) -> GameResult<()> {
        let mut games = self.games.write().await;
        let handle = games
            .remove(game_id)
            .ok_or_else(|| GameError::GameNotFound(game_id.to_string()))?;
        drop(games);

        handle.close().await;

        if let Err(e) = self.store.delete(game_id).await {
            log::warn!("Game {}: failed to delete stored state: {}", game_id, e);
        }

        log::info!("Deleted game {}", game_id);
        Ok(())
    }

    /// Resolve an owner token to its game and owner name
    pub async fn find_owner_by_token(&self, token: &str) -> GameResult<(GameHandle, String)> {
        let games = self.games.read().await;
        games
            .values()
            .find_map(|handle| {
                let snapshot = handle.snapshot();
                snapshot
                    .owner_for_token(token)
                    .map(|owner| (handle.clone(), owner.to_string()))
            })
            .ok_or(GameError::UnknownToken)
    }

    /// Number of games held by the manager
    pub async fn game_count(&self) -> usize {
        self.games.read().await.len()
    }

    /// Number of games that have not ended
    pub async fn active_game_count(&self) -> usize {
        let games = self.games.read().await;
        games.values().filter(|h| h.snapshot().is_active()).count()
    }

    /// Stop every actor. Stored state is kept.
    pub async fn shutdown(&self) {
        let handles: Vec<GameHandle> = self.games.write().await.drain().map(|(_, h)| h).collect();
        for handle in &handles {
            handle.close().await;
        }
        log::info!("Stopped {} game(s)", handles.len());
    }
}
