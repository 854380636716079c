//! Stage progression and game lifecycle.

use super::{
    errors::{GameError, GameResult},
    state::GameState,
};
use serde::{Deserialize, Serialize};

/// Game stage. Playable stages are the prize tiers, in order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Lobby,
    Single,
    Double,
    Full,
    Ended,
}

impl Stage {
    /// Stage that follows this one. `Ended` is terminal.
    pub fn next(self) -> Stage {
        match self {
            Stage::Lobby => Stage::Single,
            Stage::Single => Stage::Double,
            Stage::Double => Stage::Full,
            Stage::Full | Stage::Ended => Stage::Ended,
        }
    }

    /// Whether claims and calls are accepted in this stage
    pub fn is_playable(self) -> bool {
        matches!(self, Stage::Single | Stage::Double | Stage::Full)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Lobby => "lobby",
            Stage::Single => "single",
            Stage::Double => "double",
            Stage::Full => "full",
            Stage::Ended => "ended",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prize amounts per stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payouts {
    pub single: i64,
    pub double: i64,
    pub full: i64,
}

impl Payouts {
    /// Split a pot 1/6, 2/6, remainder
    pub fn split_pot(pot: i64) -> Self {
        let single = pot / 6;
        // floor(2p / 6) == floor(p / 3) without the doubling
        let double = pot / 3;
        Self {
            single,
            double,
            full: pot - (single + double),
        }
    }

    pub fn for_stage(&self, stage: Stage) -> Option<i64> {
        match stage {
            Stage::Single => Some(self.single),
            Stage::Double => Some(self.double),
            Stage::Full => Some(self.full),
            Stage::Lobby | Stage::Ended => None,
        }
    }
}

impl GameState {
    /// Open the first playable stage
    pub fn start(&mut self) -> GameResult<Stage> {
        if !self.is_active() {
            return Err(GameError::GameClosed);
        }
        if self.started {
            return Err(GameError::AlreadyStarted);
        }

        self.started = true;
        self.stage = Stage::Single;
        log::info!("[bingo] Game {} started (stage={})", self.game_id, self.stage);
        Ok(self.stage)
    }

    /// Move to the next stage; advancing past `full` ends the game
    pub fn advance_stage(&mut self) -> GameResult<Stage> {
        if !self.is_active() {
            return Err(GameError::GameClosed);
        }
        if !self.started {
            return Err(GameError::NotStarted);
        }

        let previous = self.stage;
        self.stage = self.stage.next();
        log::info!(
            "[bingo] Game {} stage {} -> {}",
            self.game_id,
            previous,
            self.stage
        );
        Ok(self.stage)
    }

    /// Force-terminate. Returns `false` when the game had already ended.
    pub fn end(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.stage = Stage::Ended;
        log::info!("[bingo] Ended game {}", self.game_id);
        true
    }

    /// Configured payouts, or the pot split when none were fixed at creation
    pub fn payouts(&self) -> Payouts {
        self.config
            .payouts
            .unwrap_or_else(|| Payouts::split_pot(self.pot))
    }
}
