//! Read-only projections served to polling clients.

use super::{
    card::Card,
    claims::{Claim, ClaimSource},
    owners::OwnerSummary,
    stage::{Payouts, Stage},
    state::GameState,
};
use serde::Serialize;

/// Public game information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameInfo {
    pub game_id: String,
    pub title: String,
    pub header: String,
    pub header_text: String,
    pub price: i64,
    pub currency: String,
    pub max_cards_per_player: usize,
    pub grid_size: usize,
    pub max_number: u32,
    pub pot: i64,
    pub called: Vec<u32>,
    pub last_called: Option<u32>,
    pub started: bool,
    pub stage: Stage,
    pub payouts: Payouts,
    pub background: Option<String>,
    pub theme_color: Option<String>,
    pub active: bool,
    pub claims: Vec<ClaimView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameStats {
    pub cards: usize,
    pub players: usize,
}

/// Polling projection: `{active, game, stats}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameProjection {
    pub active: bool,
    pub game: GameInfo,
    pub stats: GameStats,
}

/// Claim as shown to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimView {
    pub ts: i64,
    pub owner_name: String,
    pub card_id: String,
    pub stage: Stage,
    pub pending: bool,
    pub denied: bool,
    pub source: ClaimSource,
}

impl From<&Claim> for ClaimView {
    fn from(claim: &Claim) -> Self {
        Self {
            ts: claim.ts.timestamp(),
            owner_name: claim.owner_name.clone(),
            card_id: claim.card_id.clone(),
            stage: claim.stage,
            pending: claim.is_pending(),
            denied: claim.is_denied(),
            source: claim.source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub card_id: String,
    pub owner_name: String,
    pub numbers: Vec<Vec<u32>>,
    pub marks: Vec<Vec<bool>>,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            card_id: card.card_id.clone(),
            owner_name: card.owner_name.clone(),
            numbers: card.numbers.clone(),
            marks: card.marks.clone(),
        }
    }
}

/// An owner's cards together with the game they belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerCards {
    pub owner: String,
    pub game: GameInfo,
    pub cards: Vec<CardView>,
}

/// Row in the admin game listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub game_id: String,
    pub title: String,
    pub created_at: i64,
    pub active: bool,
    pub stage: Stage,
    pub pot: i64,
}

impl GameState {
    pub fn info(&self) -> GameInfo {
        let config = &self.config;
        GameInfo {
            game_id: self.game_id.clone(),
            title: config.title.clone(),
            header: config.header(),
            header_text: config.header_text.clone(),
            price: config.price,
            currency: config.currency.clone(),
            max_cards_per_player: config.max_cards_per_player,
            grid_size: config.grid_size,
            max_number: config.max_number,
            pot: self.pot,
            called: self.called.clone(),
            last_called: self.last_called,
            started: self.started,
            stage: self.stage,
            payouts: self.payouts(),
            background: config.background.clone(),
            theme_color: config.theme_color.clone(),
            active: self.is_active(),
            claims: self.claims.iter().map(ClaimView::from).collect(),
        }
    }

    pub fn projection(&self) -> GameProjection {
        GameProjection {
            active: self.is_active(),
            game: self.info(),
            stats: GameStats {
                cards: self.cards.len(),
                players: self.player_count(),
            },
        }
    }

    pub fn owner_view(&self, owner_name: &str) -> OwnerCards {
        OwnerCards {
            owner: owner_name.to_string(),
            game: self.info(),
            cards: self
                .owner_cards(owner_name)
                .into_iter()
                .map(CardView::from)
                .collect(),
        }
    }

    pub fn owners_view(&self) -> Vec<OwnerSummary> {
        self.owner_summaries()
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            game_id: self.game_id.clone(),
            title: self.config.title.clone(),
            created_at: self.created_at.timestamp(),
            active: self.is_active(),
            stage: self.stage,
            pot: self.pot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameConfig;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_projection_shape() {
        let mut rng = StdRng::seed_from_u64(8);
        let config = GameConfig {
            price: 100,
            ..GameConfig::default()
        };
        let mut g = GameState::new("g1".to_string(), config);
        g.buy("alice", 2, &mut rng).unwrap();
        g.buy("bob", 1, &mut rng).unwrap();

        let value = serde_json::to_value(g.projection()).unwrap();
        assert_eq!(value["active"], true);
        assert_eq!(value["stats"]["cards"], 3);
        assert_eq!(value["stats"]["players"], 2);
        assert_eq!(value["game"]["pot"], 300);
        assert_eq!(value["game"]["stage"], "lobby");
        assert_eq!(value["game"]["header"], "BINGO");
        assert_eq!(value["game"]["payouts"]["single"], 50);
        assert!(value["game"]["last_called"].is_null());
    }

    #[test]
    fn test_claim_view_flags() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut g = GameState::new("g1".to_string(), GameConfig::default());
        let card = g.buy("alice", 1, &mut rng).unwrap().remove(0);
        g.start().unwrap();
        for n in card.numbers[0].clone() {
            g.call(n).unwrap();
        }
        g.submit_claim(&card.card_id, "alice", ClaimSource::Public)
            .unwrap();
        g.deny_claim(&card.card_id).unwrap();

        let views = g.info().claims;
        assert_eq!(views.len(), 1);
        assert!(!views[0].pending);
        assert!(views[0].denied);
        assert_eq!(views[0].stage, Stage::Single);
    }

    #[test]
    fn test_owner_view_only_lists_own_cards() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut g = GameState::new("g1".to_string(), GameConfig::default());
        g.buy("alice", 2, &mut rng).unwrap();
        g.buy("bob", 1, &mut rng).unwrap();

        let view = g.owner_view("alice");
        assert_eq!(view.cards.len(), 2);
        assert!(view.cards.iter().all(|c| c.owner_name == "alice"));
        assert!(g.owner_view("nobody").cards.is_empty());
    }
}
