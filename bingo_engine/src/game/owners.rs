//! Owner registry: per-owner purchase records and access tokens.

use super::{card::Card, state::GameState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Purchase record for one owner in one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRecord {
    pub owner_name: String,
    /// Opaque capability granting direct access to this owner's cards
    pub token: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub last_purchase: DateTime<Utc>,
}

/// Owners in order of first purchase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRegistry {
    owners: Vec<OwnerRecord>,
}

impl OwnerRegistry {
    /// Record a purchase, minting a token on the owner's first one
    pub fn record_purchase(&mut self, owner_name: &str, at: DateTime<Utc>) -> &OwnerRecord {
        let idx = match self.owners.iter().position(|o| o.owner_name == owner_name) {
            Some(idx) => {
                self.owners[idx].last_purchase = at;
                idx
            }
            None => {
                self.owners.push(OwnerRecord {
                    owner_name: owner_name.to_string(),
                    token: Uuid::new_v4().simple().to_string(),
                    last_purchase: at,
                });
                self.owners.len() - 1
            }
        };
        &self.owners[idx]
    }

    pub fn get(&self, owner_name: &str) -> Option<&OwnerRecord> {
        self.owners.iter().find(|o| o.owner_name == owner_name)
    }

    /// Look an owner up by token without short-circuiting on the first differing byte
    pub fn find_by_token(&self, token: &str) -> Option<&OwnerRecord> {
        self.owners
            .iter()
            .find(|o| bool::from(o.token.as_bytes().ct_eq(token.as_bytes())))
    }

    pub fn iter(&self) -> impl Iterator<Item = &OwnerRecord> {
        self.owners.iter()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Derived per-owner view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerSummary {
    pub owner_name: String,
    pub cards: usize,
    pub last_purchase: i64,
    pub token: Option<String>,
}

impl GameState {
    pub fn owner_card_count(&self, owner_name: &str) -> usize {
        self.cards
            .iter()
            .filter(|c| c.owner_name == owner_name)
            .count()
    }

    /// An owner's cards, oldest first
    pub fn owner_cards(&self, owner_name: &str) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|c| c.owner_name == owner_name)
            .collect()
    }

    pub fn owner_summaries(&self) -> Vec<OwnerSummary> {
        self.owners
            .iter()
            .map(|o| OwnerSummary {
                owner_name: o.owner_name.clone(),
                cards: self.owner_card_count(&o.owner_name),
                last_purchase: o.last_purchase.timestamp(),
                token: Some(o.token.clone()),
            })
            .collect()
    }

    /// Resolve an owner token to the owner's name
    pub fn owner_for_token(&self, token: &str) -> Option<&str> {
        self.owners
            .find_by_token(token)
            .map(|o| o.owner_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameConfig;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_token_is_stable_across_purchases() {
        let mut registry = OwnerRegistry::default();
        let first = registry.record_purchase("alice", Utc::now()).token.clone();
        let second = registry.record_purchase("alice", Utc::now()).token.clone();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_tokens_differ_per_owner() {
        let mut registry = OwnerRegistry::default();
        let a = registry.record_purchase("alice", Utc::now()).token.clone();
        let b = registry.record_purchase("bob", Utc::now()).token.clone();
        assert_ne!(a, b);
        assert_eq!(registry.find_by_token(&b).unwrap().owner_name, "bob");
        assert!(registry.find_by_token("nope").is_none());
    }

    #[test]
    fn test_owner_summaries() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut g = GameState::new("g1".to_string(), GameConfig::default());
        g.buy("alice", 2, &mut rng).unwrap();
        g.buy("bob", 1, &mut rng).unwrap();
        g.buy("alice", 1, &mut rng).unwrap();

        let summaries = g.owner_summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].owner_name, "alice");
        assert_eq!(summaries[0].cards, 3);
        assert_eq!(summaries[1].cards, 1);

        let token = summaries[1].token.clone().unwrap();
        assert_eq!(g.owner_for_token(&token), Some("bob"));
    }
}
