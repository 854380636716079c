//! Claim arbitration.
//!
//! A claim moves exactly once from `pending` to `approved` or `denied` and is
//! kept afterwards as history. Approving or denying a claim that is no longer
//! pending is a no-op so admin retries are safe.

use super::{
    errors::{GameError, GameResult},
    stage::Stage,
    state::GameState,
    win::evaluate_card,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Denied,
}

/// Where a claim came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimSource {
    #[default]
    Public,
    Admin,
}

impl std::fmt::Display for ClaimSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimSource::Public => write!(f, "public"),
            ClaimSource::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub ts: DateTime<Utc>,
    pub owner_name: String,
    pub card_id: String,
    /// Stage the game was in when the claim was raised
    pub stage: Stage,
    pub status: ClaimStatus,
    pub source: ClaimSource,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Claim {
    pub fn is_pending(&self) -> bool {
        self.status == ClaimStatus::Pending
    }

    pub fn is_denied(&self) -> bool {
        self.status == ClaimStatus::Denied
    }

    pub fn is_approved(&self) -> bool {
        self.status == ClaimStatus::Approved
    }
}

/// Outcome of an approve/deny request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimDecision {
    pub claim: Claim,
    /// `false` when the claim had already been resolved
    pub changed: bool,
}

impl GameState {
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn pending_claims(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter().filter(|c| c.is_pending())
    }

    /// Raise a claim for `card_id` on behalf of `owner_name`.
    ///
    /// The card is re-evaluated against the called numbers; only a card that
    /// satisfies the current stage produces a pending claim.
    pub fn submit_claim(
        &mut self,
        card_id: &str,
        owner_name: &str,
        source: ClaimSource,
    ) -> GameResult<Claim> {
        if !self.is_active() {
            return Err(GameError::GameClosed);
        }
        if !self.stage.is_playable() {
            return Err(GameError::NotStarted);
        }

        let card = self
            .card(card_id)
            .filter(|c| c.owner_name == owner_name.trim())
            .ok_or(GameError::UnknownCard)?;

        let stage = self.stage;
        if !evaluate_card(card, &self.called_set()).satisfies(stage) {
            return Err(GameError::StageMismatch(stage));
        }

        let owner_name = card.owner_name.clone();
        let for_card = || self.claims.iter().filter(|c| c.card_id == card_id);

        if for_card().any(Claim::is_pending) {
            return Err(GameError::DuplicatePending);
        }
        if for_card().any(|c| c.stage == stage && c.is_denied()) {
            return Err(GameError::ClaimDenied(stage));
        }
        if for_card().any(|c| c.stage == stage && c.is_approved()) {
            return Err(GameError::AlreadyAwarded(stage));
        }

        let claim = Claim {
            ts: Utc::now(),
            owner_name,
            card_id: card_id.to_string(),
            stage,
            status: ClaimStatus::Pending,
            source,
            resolved_at: None,
        };
        self.claims.push(claim.clone());

        log::info!(
            "[bingo] Claim by {} on card {} (stage={}, source={}) in game {}",
            claim.owner_name,
            claim.card_id,
            claim.stage,
            claim.source,
            self.game_id
        );

        Ok(claim)
    }

    /// Approve the card's pending claim. Stage progression stays a separate step.
    pub fn approve_claim(&mut self, card_id: &str) -> GameResult<ClaimDecision> {
        self.resolve_claim(card_id, ClaimStatus::Approved)
    }

    pub fn deny_claim(&mut self, card_id: &str) -> GameResult<ClaimDecision> {
        self.resolve_claim(card_id, ClaimStatus::Denied)
    }

    fn resolve_claim(&mut self, card_id: &str, status: ClaimStatus) -> GameResult<ClaimDecision> {
        let idx = self
            .claims
            .iter()
            .rposition(|c| c.card_id == card_id)
            .ok_or_else(|| GameError::ClaimNotFound(card_id.to_string()))?;

        if !self.claims[idx].is_pending() {
            return Ok(ClaimDecision {
                claim: self.claims[idx].clone(),
                changed: false,
            });
        }

        if !self.is_active() {
            return Err(GameError::GameClosed);
        }

        let claim = &mut self.claims[idx];
        claim.status = status;
        claim.resolved_at = Some(Utc::now());

        log::info!(
            "[bingo] Claim on card {} {:?} (stage={}) in game {}",
            claim.card_id,
            claim.status,
            claim.stage,
            self.game_id
        );

        Ok(ClaimDecision {
            claim: claim.clone(),
            changed: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameConfig;
    use rand::{SeedableRng, rngs::StdRng};

    /// Started game with one card for alice; returns the card ID
    fn setup() -> (GameState, String) {
        let mut rng = StdRng::seed_from_u64(21);
        let mut g = GameState::new("g1".to_string(), GameConfig::default());
        let card_id = g.buy("alice", 1, &mut rng).unwrap()[0].card_id.clone();
        g.start().unwrap();
        (g, card_id)
    }

    fn call_row(g: &mut GameState, card_id: &str, row: usize) {
        let numbers = g.card(card_id).unwrap().numbers[row].clone();
        for n in numbers {
            let _ = g.call(n);
        }
    }

    #[test]
    fn test_claim_without_win_fails() {
        let (mut g, card_id) = setup();
        assert_eq!(
            g.submit_claim(&card_id, "alice", ClaimSource::Public),
            Err(GameError::StageMismatch(Stage::Single))
        );
        assert!(g.claims().is_empty());
    }

    #[test]
    fn test_claim_for_wrong_owner_fails() {
        let (mut g, card_id) = setup();
        call_row(&mut g, &card_id, 0);
        assert_eq!(
            g.submit_claim(&card_id, "mallory", ClaimSource::Public),
            Err(GameError::UnknownCard)
        );
        assert_eq!(
            g.submit_claim("missing", "alice", ClaimSource::Public),
            Err(GameError::UnknownCard)
        );
    }

    #[test]
    fn test_claim_in_lobby_fails() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut g = GameState::new("g1".to_string(), GameConfig::default());
        let card_id = g.buy("alice", 1, &mut rng).unwrap()[0].card_id.clone();
        assert_eq!(
            g.submit_claim(&card_id, "alice", ClaimSource::Public),
            Err(GameError::NotStarted)
        );
    }

    #[test]
    fn test_valid_claim_becomes_pending() {
        let (mut g, card_id) = setup();
        call_row(&mut g, &card_id, 1);

        let claim = g
            .submit_claim(&card_id, "alice", ClaimSource::Public)
            .unwrap();
        assert!(claim.is_pending());
        assert_eq!(claim.stage, Stage::Single);
        assert_eq!(g.pending_claims().count(), 1);

        assert_eq!(
            g.submit_claim(&card_id, "alice", ClaimSource::Public),
            Err(GameError::DuplicatePending)
        );
        assert_eq!(g.claims().len(), 1);
    }

    #[test]
    fn test_approve_is_idempotent() {
        let (mut g, card_id) = setup();
        call_row(&mut g, &card_id, 0);
        g.submit_claim(&card_id, "alice", ClaimSource::Public)
            .unwrap();

        let first = g.approve_claim(&card_id).unwrap();
        assert!(first.changed);
        assert!(first.claim.is_approved());

        let second = g.approve_claim(&card_id).unwrap();
        assert!(!second.changed);
        assert!(second.claim.is_approved());

        // A later deny does not overturn the approval
        let deny = g.deny_claim(&card_id).unwrap();
        assert!(!deny.changed);
        assert!(deny.claim.is_approved());

        assert_eq!(
            g.submit_claim(&card_id, "alice", ClaimSource::Public),
            Err(GameError::AlreadyAwarded(Stage::Single))
        );
    }

    #[test]
    fn test_denied_card_may_claim_later_stage_only() {
        let (mut g, card_id) = setup();
        call_row(&mut g, &card_id, 0);
        g.submit_claim(&card_id, "alice", ClaimSource::Public)
            .unwrap();

        assert!(g.deny_claim(&card_id).unwrap().changed);
        assert!(!g.deny_claim(&card_id).unwrap().changed);

        assert_eq!(
            g.submit_claim(&card_id, "alice", ClaimSource::Public),
            Err(GameError::ClaimDenied(Stage::Single))
        );

        g.advance_stage().unwrap();
        call_row(&mut g, &card_id, 1);
        let claim = g
            .submit_claim(&card_id, "alice", ClaimSource::Public)
            .unwrap();
        assert_eq!(claim.stage, Stage::Double);
        assert_eq!(g.claims().len(), 2);
    }

    #[test]
    fn test_resolve_unknown_claim() {
        let (mut g, card_id) = setup();
        assert_eq!(
            g.approve_claim(&card_id),
            Err(GameError::ClaimNotFound(card_id.clone()))
        );
    }

    #[test]
    fn test_pending_claim_cannot_be_resolved_after_end() {
        let (mut g, card_id) = setup();
        call_row(&mut g, &card_id, 0);
        g.submit_claim(&card_id, "alice", ClaimSource::Admin)
            .unwrap();
        g.end();
        assert_eq!(g.approve_claim(&card_id), Err(GameError::GameClosed));
        assert!(g.claims()[0].is_pending());
    }
}
