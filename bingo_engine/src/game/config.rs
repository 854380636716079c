//! Game configuration models.

use super::stage::Payouts;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Upper bound on cards bought in one request
pub const MAX_CARDS_PER_PURCHASE: usize = 10;

/// Smallest supported grid
pub const MIN_GRID_SIZE: usize = 3;

/// Largest supported grid
pub const MAX_GRID_SIZE: usize = 8;

/// Largest supported number pool
pub const MAX_NUMBER_LIMIT: u32 = 999;

/// Game configuration, fixed at creation except for the fields in [`GameUpdate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Display title
    pub title: String,

    /// Raw header text; see [`GameConfig::header`]
    pub header_text: String,

    /// Price per card
    pub price: i64,

    /// Currency label (cosmetic)
    pub currency: String,

    /// Per-owner card cap
    pub max_cards_per_player: usize,

    /// Cards are `grid_size` x `grid_size`
    pub grid_size: usize,

    /// Pool is `1..=max_number`
    pub max_number: u32,

    /// Pre-mark the center cell (odd grids only)
    pub free_center: bool,

    /// Keep card sales open after the game starts
    pub allow_late_purchases: bool,

    /// Fixed payouts; `None` splits the pot
    pub payouts: Option<Payouts>,

    /// Background image URL, passed through verbatim
    pub background: Option<String>,

    /// Theme color, passed through verbatim
    pub theme_color: Option<String>,

    /// Chat channel the game was announced in
    pub channel_id: Option<i64>,

    /// Admin who created the game
    pub created_by: Option<i64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Bingo".to_string(),
            header_text: "BINGO".to_string(),
            price: 0,
            currency: "gil".to_string(),
            max_cards_per_player: 10,
            grid_size: 5,
            max_number: 75,
            free_center: false,
            allow_late_purchases: false,
            payouts: None,
            background: None,
            theme_color: None,
            channel_id: None,
            created_by: None,
        }
    }
}

impl GameConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title must not be empty".to_string());
        }

        if self.price < 0 {
            return Err("Price must not be negative".to_string());
        }

        if self.max_cards_per_player == 0 || self.max_cards_per_player > 100 {
            return Err("Max cards per player must be between 1 and 100".to_string());
        }

        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(format!(
                "Grid size must be between {} and {}",
                MIN_GRID_SIZE, MAX_GRID_SIZE
            ));
        }

        if self.max_number > MAX_NUMBER_LIMIT {
            return Err(format!("Max number must be at most {}", MAX_NUMBER_LIMIT));
        }

        if (self.max_number as usize) / self.grid_size < self.grid_size {
            return Err(format!(
                "Max number {} is too small for a {}x{} grid (need at least {})",
                self.max_number,
                self.grid_size,
                self.grid_size,
                self.grid_size * self.grid_size
            ));
        }

        if self.free_center && self.grid_size % 2 == 0 {
            return Err("Free center requires an odd grid size".to_string());
        }

        if let Some(p) = self.payouts
            && (p.single < 0 || p.double < 0 || p.full < 0)
        {
            return Err("Payouts must not be negative".to_string());
        }

        Ok(())
    }

    /// Header normalized to one uppercase letter per column
    pub fn header(&self) -> String {
        let mut header: String = self
            .header_text
            .trim()
            .to_uppercase()
            .chars()
            .take(self.grid_size)
            .collect();
        while header.chars().count() < self.grid_size {
            header.push(' ');
        }
        header
    }

    /// Numbers a card may carry in column `col`. The last band absorbs the remainder.
    pub fn column_range(&self, col: usize) -> RangeInclusive<u32> {
        let band = self.max_number / self.grid_size as u32;
        let lo = col as u32 * band + 1;
        let hi = if col + 1 == self.grid_size {
            self.max_number
        } else {
            (col as u32 + 1) * band
        };
        lo..=hi
    }

    /// Whether `number` belongs to the pool
    pub fn in_pool(&self, number: u32) -> bool {
        (1..=self.max_number).contains(&number)
    }
}

/// Fields an admin may change after creation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameUpdate {
    pub title: Option<String>,
    pub header_text: Option<String>,
    pub background: Option<String>,
    pub theme_color: Option<String>,
    pub max_cards_per_player: Option<usize>,
}
