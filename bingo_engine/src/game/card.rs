//! Card model and allocation.

use super::{
    config::{GameConfig, MAX_CARDS_PER_PURCHASE},
    errors::{GameError, GameResult},
    state::GameState,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Card ID type
pub type CardId = String;

/// A single bingo card. `numbers` never changes after issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub card_id: CardId,
    pub owner_name: String,
    pub numbers: Vec<Vec<u32>>,
    /// Server-side marks (free space, manual dabs)
    pub marks: Vec<Vec<bool>>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub purchased_at: DateTime<Utc>,
}

impl Card {
    /// Generate a card using column-banded ranges from the game's pool.
    ///
    /// Each column draws `grid_size` distinct numbers from its own band, and
    /// bands never overlap, so a card never repeats a number.
    pub fn generate<R: Rng + ?Sized>(
        config: &GameConfig,
        owner_name: &str,
        purchased_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        let size = config.grid_size;
        let mut numbers = vec![vec![0u32; size]; size];

        for col in 0..size {
            let band = config.column_range(col);
            let lo = *band.start();
            let len = (*band.end() - lo + 1) as usize;
            let picks = rand::seq::index::sample(rng, len, size);
            for (row, offset) in picks.into_iter().enumerate() {
                numbers[row][col] = lo + offset as u32;
            }
        }

        let mut marks = vec![vec![false; size]; size];
        if config.free_center {
            marks[size / 2][size / 2] = true;
        }

        Self {
            card_id: Uuid::new_v4().simple().to_string(),
            owner_name: owner_name.to_string(),
            numbers,
            marks,
            purchased_at,
        }
    }

    /// Grid dimension
    pub fn size(&self) -> usize {
        self.numbers.len()
    }
}

impl GameState {
    /// Issue `quantity` new cards to `owner_name`.
    ///
    /// Either every card is issued and the pot grows by `price * quantity`,
    /// or nothing changes.
    pub fn buy<R: Rng + ?Sized>(
        &mut self,
        owner_name: &str,
        quantity: usize,
        rng: &mut R,
    ) -> GameResult<Vec<Card>> {
        let owner_name = owner_name.trim();
        if owner_name.is_empty() {
            return Err(GameError::Validation("Owner name required".to_string()));
        }

        if quantity == 0 || quantity > MAX_CARDS_PER_PURCHASE {
            return Err(GameError::Validation(format!(
                "Quantity must be between 1 and {}",
                MAX_CARDS_PER_PURCHASE
            )));
        }

        if !self.is_active() || (self.started && !self.config.allow_late_purchases) {
            return Err(GameError::GameClosed);
        }

        let have = self.owner_card_count(owner_name);
        let max = self.config.max_cards_per_player;
        if have + quantity > max {
            return Err(GameError::LimitExceeded {
                have,
                requested: quantity,
                max,
            });
        }

        let cost = self
            .config
            .price
            .checked_mul(quantity as i64)
            .and_then(|c| c.checked_add(self.pot))
            .ok_or_else(|| GameError::Validation("Pot overflow".to_string()))?;

        let now = Utc::now();
        let cards: Vec<Card> = (0..quantity)
            .map(|_| Card::generate(&self.config, owner_name, now, rng))
            .collect();

        self.cards.extend(cards.iter().cloned());
        self.pot = cost;
        self.owners.record_purchase(owner_name, now);

        log::info!(
            "[bingo] {} bought {} card(s) in game {} (+{} {}, pot={})",
            owner_name,
            cards.len(),
            self.game_id,
            self.config.price * quantity as i64,
            self.config.currency,
            self.pot
        );

        Ok(cards)
    }
}
