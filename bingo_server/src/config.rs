//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::{net::SocketAddr, path::PathBuf, time::Duration};

/// Default HTTP bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Minimum admin API key length
pub const MIN_API_KEY_LEN: usize = 16;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Admin API keys accepted by the auth middleware
    pub api_keys: Vec<String>,
    /// Directory for JSON game snapshots; in-memory only when unset
    pub data_dir: Option<PathBuf>,
    /// Prometheus exporter address; metrics disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Public endpoint rate limiting
    pub rate_limit: RateLimitConfig,
    /// Per-game actor inbox capacity
    pub inbox_capacity: usize,
}

/// Sliding-window limits for unauthenticated write endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests per key within the window
    pub max_requests: usize,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `data_dir_override` - Optional data directory override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or malformed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        data_dir_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => match parse_addr("SERVER_BIND", std::env::var("SERVER_BIND").ok())? {
                Some(bind) => bind,
                None => default_bind()?,
            },
        };

        let raw_keys = std::env::var("BINGO_API_KEYS").map_err(|_| ConfigError::MissingRequired {
            var: "BINGO_API_KEYS".to_string(),
            hint: "Comma-separated admin keys; generate one with: openssl rand -hex 16"
                .to_string(),
        })?;
        let api_keys = parse_api_keys(&raw_keys);

        let data_dir = data_dir_override.or_else(|| {
            std::env::var("BINGO_DATA_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
        });

        let metrics_bind = parse_addr("METRICS_BIND", std::env::var("METRICS_BIND").ok())?;

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            max_requests: parse_env_or("PUBLIC_RATE_LIMIT", defaults.max_requests),
            window: Duration::from_secs(parse_env_or(
                "PUBLIC_RATE_WINDOW_SECS",
                defaults.window.as_secs(),
            )),
        };

        let inbox_capacity = parse_env_or(
            "GAME_INBOX_CAPACITY",
            bingo_engine::session::DEFAULT_INBOX_CAPACITY,
        );

        Ok(ServerConfig {
            bind,
            api_keys,
            data_dir,
            metrics_bind,
            rate_limit,
            inbox_capacity,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_keys.is_empty() {
            return Err(ConfigError::Invalid {
                var: "BINGO_API_KEYS".to_string(),
                reason: "At least one key is required".to_string(),
            });
        }

        if self.api_keys.iter().any(|k| k.len() < MIN_API_KEY_LEN) {
            return Err(ConfigError::Invalid {
                var: "BINGO_API_KEYS".to_string(),
                reason: format!("Each key must be at least {} characters", MIN_API_KEY_LEN),
            });
        }

        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Invalid {
                var: "PUBLIC_RATE_LIMIT".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.rate_limit.window.is_zero() {
            return Err(ConfigError::Invalid {
                var: "PUBLIC_RATE_WINDOW_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.inbox_capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "GAME_INBOX_CAPACITY".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if let Some(metrics_bind) = self.metrics_bind
            && metrics_bind == self.bind
        {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server bind address ({})", self.bind),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Split a comma-separated key list, dropping blanks
pub fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_bind() -> Result<SocketAddr, ConfigError> {
    DEFAULT_BIND.parse().map_err(|_| ConfigError::Invalid {
        var: "SERVER_BIND".to_string(),
        reason: format!("Default {} is not a socket address", DEFAULT_BIND),
    })
}

fn parse_addr(var: &str, value: Option<String>) -> Result<Option<SocketAddr>, ConfigError> {
    match value.filter(|v| !v.trim().is_empty()) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var: var.to_string(),
                reason: format!("{:?} is not a socket address (expected IP:PORT)", v),
            }),
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:8080".parse().unwrap(),
            api_keys: vec!["k".repeat(16)],
            data_dir: None,
            metrics_bind: None,
            rate_limit: RateLimitConfig::default(),
            inbox_capacity: 100,
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "BINGO_API_KEYS".to_string(),
            hint: "Use openssl".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("BINGO_API_KEYS"));
        assert!(msg.contains("Use openssl"));
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_short_api_key_rejected() {
        let config = ServerConfig {
            api_keys: vec!["k".repeat(16), "short".to_string()],
            ..config()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Invalid { .. }
        ));
    }

    #[test]
    fn test_no_api_keys_rejected() {
        let config = ServerConfig {
            api_keys: Vec::new(),
            ..config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let config = ServerConfig {
            rate_limit: RateLimitConfig {
                max_requests: 0,
                window: Duration::from_secs(1),
            },
            ..config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_metrics_bind_must_differ() {
        let config = ServerConfig {
            metrics_bind: Some("127.0.0.1:8080".parse().unwrap()),
            ..config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_api_keys() {
        assert_eq!(
            parse_api_keys(" aaaa , ,bbbb,"),
            vec!["aaaa".to_string(), "bbbb".to_string()]
        );
        assert!(parse_api_keys("").is_empty());
    }

    #[test]
    fn test_parse_addr() {
        assert_eq!(parse_addr("X", None).unwrap(), None);
        assert_eq!(parse_addr("X", Some(" ".to_string())).unwrap(), None);
        assert!(parse_addr("X", Some("0.0.0.0:9090".to_string())).unwrap().is_some());
        assert!(parse_addr("X", Some("nope".to_string())).is_err());
    }
}
