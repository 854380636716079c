//! Call sequencing: the append-only log of called numbers.

use super::{
    errors::{GameError, GameResult},
    state::GameState,
};
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;

/// A called number with the call log as it stood right after it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallOutcome {
    pub number: u32,
    pub called: Vec<u32>,
}

impl GameState {
    /// Called numbers in call order
    pub fn called(&self) -> &[u32] {
        &self.called
    }

    pub fn last_called(&self) -> Option<u32> {
        self.last_called
    }

    pub fn is_called(&self, number: u32) -> bool {
        self.called.contains(&number)
    }

    pub fn called_set(&self) -> HashSet<u32> {
        self.called.iter().copied().collect()
    }

    /// Pool numbers not yet called, ascending
    pub fn remaining_numbers(&self) -> Vec<u32> {
        let called = self.called_set();
        (1..=self.config.max_number)
            .filter(|n| !called.contains(n))
            .collect()
    }

    /// Draw one uncalled number uniformly at random and call it
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<u32> {
        self.ensure_calling_open()?;

        let remaining = self.remaining_numbers();
        if remaining.is_empty() {
            return Err(GameError::PoolExhausted);
        }

        let number = remaining[rng.random_range(0..remaining.len())];
        self.record_call(number);
        Ok(number)
    }

    /// Call a specific number
    pub fn call(&mut self, number: u32) -> GameResult<u32> {
        self.ensure_calling_open()?;

        if !self.config.in_pool(number) {
            return Err(GameError::OutOfRange {
                number,
                max: self.config.max_number,
            });
        }
        if self.is_called(number) {
            return Err(GameError::AlreadyCalled(number));
        }

        self.record_call(number);
        Ok(number)
    }

    /// Pair a just-called number with the current call log
    pub(crate) fn call_outcome(&self, number: u32) -> CallOutcome {
        CallOutcome {
            number,
            called: self.called.clone(),
        }
    }

    fn ensure_calling_open(&self) -> GameResult<()> {
        if !self.is_active() {
            return Err(GameError::GameClosed);
        }
        if !self.started {
            return Err(GameError::NotStarted);
        }
        Ok(())
    }

    fn record_call(&mut self, number: u32) {
        self.called.push(number);
        self.last_called = Some(number);
        log::info!(
            "[bingo] Called number {} in game {} ({} called)",
            number,
            self.game_id,
            self.called.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameConfig;
    use rand::{SeedableRng, rngs::StdRng};

    fn started_game(max_number: u32) -> GameState {
        let config = GameConfig {
            grid_size: 3,
            max_number,
            ..GameConfig::default()
        };
        let mut g = GameState::new("g1".to_string(), config);
        g.start().unwrap();
        g
    }

    #[test]
    fn test_call_before_start_fails() {
        let mut g = GameState::new("g1".to_string(), GameConfig::default());
        assert_eq!(g.call(5), Err(GameError::NotStarted));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(g.roll(&mut rng), Err(GameError::NotStarted));
        assert!(g.called().is_empty());
    }

    #[test]
    fn test_call_appends_in_order() {
        let mut g = started_game(75);
        g.call(42).unwrap();
        g.call(7).unwrap();
        assert_eq!(g.called(), &[42, 7]);
        assert_eq!(g.last_called(), Some(7));
    }

    #[test]
    fn test_call_rejects_duplicates_and_out_of_range() {
        let mut g = started_game(75);
        g.call(10).unwrap();
        assert_eq!(g.call(10), Err(GameError::AlreadyCalled(10)));
        assert_eq!(
            g.call(0),
            Err(GameError::OutOfRange { number: 0, max: 75 })
        );
        assert_eq!(
            g.call(76),
            Err(GameError::OutOfRange { number: 76, max: 75 })
        );
        assert_eq!(g.called(), &[10]);
    }

    #[test]
    fn test_roll_exhausts_pool_without_duplicates() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut g = started_game(9);
        for _ in 0..9 {
            g.roll(&mut rng).unwrap();
        }
        let mut called = g.called().to_vec();
        called.sort_unstable();
        assert_eq!(called, (1..=9).collect::<Vec<_>>());
        assert_eq!(g.roll(&mut rng), Err(GameError::PoolExhausted));
    }

    #[test]
    fn test_roll_skips_called_numbers() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut g = started_game(9);
        for n in 1..=8 {
            g.call(n).unwrap();
        }
        assert_eq!(g.roll(&mut rng), Ok(9));
    }

    #[test]
    fn test_calls_closed_after_end() {
        let mut g = started_game(75);
        g.end();
        assert_eq!(g.call(1), Err(GameError::GameClosed));
    }
}
