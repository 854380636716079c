//! Rate limiting for unauthenticated write endpoints.
//!
//! Each key (for example a game and owner pair) gets its own sliding window,
//! so one noisy player cannot exhaust the budget of another.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Keys tracked before idle windows are swept
const PRUNE_THRESHOLD: usize = 1024;

/// Rate limiter using a sliding window algorithm
#[derive(Debug)]
pub struct RateLimiter {
    /// Timestamps of recent requests
    timestamps: VecDeque<Instant>,
    /// Maximum number of requests allowed in the window
    max_requests: usize,
    /// Time window for rate limiting
    window: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Example
    ///
    /// ```
    /// use bingo_server::api::rate_limiter::RateLimiter;
    /// use std::time::Duration;
    ///
    /// // Allow 10 requests per minute
    /// let limiter = RateLimiter::new(10, Duration::from_secs(60));
    /// ```
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(max_requests),
            max_requests,
            window,
        }
    }

    /// Check if a request should be allowed
    ///
    /// Returns `true` if the request is allowed, `false` if rate limit exceeded.
    ///
    /// # Example
    ///
    /// ```
    /// # use bingo_server::api::rate_limiter::RateLimiter;
    /// # use std::time::Duration;
    /// let mut limiter = RateLimiter::new(5, Duration::from_secs(1));
    ///
    /// for _ in 0..5 {
    ///     assert!(limiter.check());
    /// }
    ///
    /// assert!(!limiter.check());
    /// ```
    pub fn check(&mut self) -> bool {
        self.check_at(Instant::now())
    }

    fn check_at(&mut self, now: Instant) -> bool {
        self.expire(now);

        if self.timestamps.len() >= self.max_requests {
            return false;
        }

        self.timestamps.push_back(now);
        true
    }

    /// Remove timestamps outside the window
    fn expire(&mut self, now: Instant) {
        while let Some(ts) = self.timestamps.front() {
            if now.duration_since(*ts) > self.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Get the number of remaining requests allowed in the current window
    pub fn remaining(&self) -> usize {
        self.max_requests.saturating_sub(self.timestamps.len())
    }

    /// Get the time until the oldest request leaves the window
    ///
    /// Returns `None` if there are no requests in the current window.
    pub fn reset_in(&self) -> Option<Duration> {
        self.timestamps.front().map(|oldest| {
            let elapsed = Instant::now().duration_since(*oldest);
            self.window.saturating_sub(elapsed)
        })
    }

    fn is_idle(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Outcome of a keyed rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

/// Independent sliding windows per key
#[derive(Debug)]
pub struct KeyedRateLimiter {
    limiters: Mutex<HashMap<String, RateLimiter>>,
    max_requests: usize,
    window: Duration,
}

impl KeyedRateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            limiters: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Record a request for `key` if its window has room
    pub async fn check(&self, key: &str) -> RateDecision {
        let now = Instant::now();
        let mut limiters = self.limiters.lock().await;

        if limiters.len() >= PRUNE_THRESHOLD {
            limiters.retain(|_, limiter| {
                limiter.expire(now);
                !limiter.is_idle()
            });
        }

        let limiter = limiters
            .entry(key.to_string())
            .or_insert_with(|| RateLimiter::new(self.max_requests, self.window));

        if limiter.check_at(now) {
            RateDecision::Allowed
        } else {
            RateDecision::Limited {
                retry_after: limiter.reset_in().unwrap_or(self.window),
            }
        }
    }

    /// Number of keys currently tracked
    pub async fn tracked_keys(&self) -> usize {
        self.limiters.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let mut limiter = RateLimiter::new(3, Duration::from_secs(1));

        for _ in 0..3 {
            assert!(limiter.check());
        }

        assert!(!limiter.check(), "Should block request over limit");
        assert_eq!(limiter.remaining(), 0);
    }

    #[test]
    fn test_rate_limiter_window_expiry() {
        let mut limiter = RateLimiter::new(2, Duration::from_millis(100));

        assert!(limiter.check());
        assert!(limiter.check());
        assert!(!limiter.check());

        thread::sleep(Duration::from_millis(150));

        assert!(limiter.check(), "Should allow after window expires");
        assert_eq!(limiter.remaining(), 1);
    }

    #[test]
    fn test_reset_in() {
        let mut limiter = RateLimiter::new(5, Duration::from_secs(1));
        assert!(limiter.reset_in().is_none());

        limiter.check();
        let reset = limiter.reset_in().unwrap();
        assert!(reset <= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = KeyedRateLimiter::new(2, Duration::from_secs(60));

        assert_eq!(limiter.check("game1:alice").await, RateDecision::Allowed);
        assert_eq!(limiter.check("game1:alice").await, RateDecision::Allowed);
        assert!(matches!(
            limiter.check("game1:alice").await,
            RateDecision::Limited { .. }
        ));

        assert_eq!(limiter.check("game1:bob").await, RateDecision::Allowed);
        assert_eq!(limiter.tracked_keys().await, 2);
    }

    #[tokio::test]
    async fn test_limited_reports_retry_after() {
        let limiter = KeyedRateLimiter::new(1, Duration::from_secs(30));
        limiter.check("k").await;

        match limiter.check("k").await {
            RateDecision::Limited { retry_after } => {
                assert!(retry_after <= Duration::from_secs(30));
                assert!(retry_after > Duration::from_secs(25));
            }
            RateDecision::Allowed => panic!("second request should be limited"),
        }
    }
}
