//! Directory of JSON documents, one per game.

use super::{GameStore, StoreError, StoreResult, validate_game_id};
use crate::game::GameState;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Stores each game as `<dir>/<game_id>.json`.
///
/// Writes go to a temporary file that is then renamed over the target, so a
/// crash mid-write never leaves a truncated document behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub async fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, game_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", game_id))
    }
}

#[async_trait]
impl GameStore for JsonFileStore {
    async fn save(&self, state: &GameState) -> StoreResult<()> {
        validate_game_id(state.game_id())?;

        let json = serde_json::to_vec_pretty(state)?;
        let target = self.path_for(state.game_id());
        let tmp = self.dir.join(format!(".{}.json.tmp", state.game_id()));

        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &target).await?;
        Ok(())
    }

    async fn load_all(&self) -> StoreResult<Vec<GameState>> {
        let mut games = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let bytes = fs::read(&path).await?;
            match serde_json::from_slice::<GameState>(&bytes) {
                Ok(state) => games.push(state),
                Err(e) => {
                    log::warn!("Skipping unreadable game file {}: {}", path.display(), e);
                }
            }
        }

        Ok(games)
    }

    async fn delete(&self, game_id: &str) -> StoreResult<()> {
        validate_game_id(game_id)?;
        match fs::remove_file(self.path_for(game_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
