//! Game state aggregate.

use super::{
    card::Card,
    claims::Claim,
    config::{GameConfig, GameUpdate},
    errors::{GameError, GameResult},
    owners::OwnerRegistry,
    stage::Stage,
    win::{Evaluation, evaluate_card},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Game ID type
pub type GameId = String;

/// Complete state of one game.
///
/// Mutating methods validate everything before touching any field, so a
/// failed operation leaves the state exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) game_id: GameId,
    pub(crate) config: GameConfig,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) pot: i64,
    pub(crate) called: Vec<u32>,
    pub(crate) last_called: Option<u32>,
    pub(crate) started: bool,
    pub(crate) stage: Stage,
    pub(crate) claims: Vec<Claim>,
    pub(crate) cards: Vec<Card>,
    pub(crate) owners: OwnerRegistry,
}

impl GameState {
    pub fn new(game_id: GameId, config: GameConfig) -> Self {
        Self {
            game_id,
            config,
            created_at: Utc::now(),
            pot: 0,
            called: Vec::new(),
            last_called: None,
            started: false,
            stage: Stage::Lobby,
            claims: Vec::new(),
            cards: Vec::new(),
            owners: OwnerRegistry::default(),
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn pot(&self) -> i64 {
        self.pot
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// `false` once the game has ended; an inactive game accepts no mutation
    pub fn is_active(&self) -> bool {
        self.stage != Stage::Ended
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.card_id == card_id)
    }

    pub fn owners(&self) -> &OwnerRegistry {
        &self.owners
    }

    /// Number of distinct owners holding cards
    pub fn player_count(&self) -> usize {
        self.owners.len()
    }

    /// Evaluate one card against the current called set
    pub fn evaluate(&self, card_id: &str) -> GameResult<Evaluation> {
        let card = self.card(card_id).ok_or(GameError::UnknownCard)?;
        Ok(evaluate_card(card, &self.called_set()))
    }

    /// Set a server-side mark on a card cell
    pub fn mark_cell(&mut self, card_id: &str, row: usize, col: usize) -> GameResult<()> {
        if !self.is_active() {
            return Err(GameError::GameClosed);
        }

        let card = self
            .cards
            .iter_mut()
            .find(|c| c.card_id == card_id)
            .ok_or(GameError::UnknownCard)?;

        let size = card.numbers.len();
        if row >= size || col >= size {
            return Err(GameError::Validation("Row/col out of range".to_string()));
        }

        card.marks[row][col] = true;
        Ok(())
    }

    /// Apply an admin metadata update
    pub fn update(&mut self, update: GameUpdate) -> GameResult<()> {
        if !self.is_active() {
            return Err(GameError::GameClosed);
        }

        let mut config = self.config.clone();

        if let Some(title) = update.title {
            config.title = title.trim().to_string();
        }
        if let Some(header_text) = update.header_text {
            config.header_text = header_text;
        }
        if let Some(background) = update.background {
            config.background = Some(background).filter(|b| !b.is_empty());
        }
        if let Some(theme_color) = update.theme_color {
            config.theme_color = Some(theme_color).filter(|t| !t.is_empty());
        }
        if let Some(max) = update.max_cards_per_player {
            if self.started {
                return Err(GameError::Validation(
                    "Card limit cannot change after the game starts".to_string(),
                ));
            }
            let largest = self
                .owners
                .iter()
                .map(|o| self.owner_card_count(&o.owner_name))
                .max()
                .unwrap_or(0);
            if max < largest {
                return Err(GameError::Validation(format!(
                    "Card limit {} is below an existing owner's {} cards",
                    max, largest
                )));
            }
            config.max_cards_per_player = max;
        }

        config.validate().map_err(GameError::Validation)?;
        self.config = config;
        log::info!("[bingo] Updated game {}", self.game_id);
        Ok(())
    }
}
