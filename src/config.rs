//! Runtime configuration loaded from environment variables.
//!
//! Everything has a sensible default so embedding applications can use
//! `Config::default()` without any environment setup.

use std::env;
use std::time::Duration;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
/// Five years, the oldest activity window start we accept.
const MAX_WINDOW_PAST_MS: i64 = 5 * 365 * DAY_MS;
/// One year, the furthest-future window end we accept.
const MAX_WINDOW_FUTURE_MS: i64 = 365 * DAY_MS;

/// Library configuration, loaded once at construction.
#[derive(Debug, Clone)]
pub struct Config {
    /// Timeout applied to every remote query (roster and activity fetches).
    pub query_timeout: Duration,
    /// Expected identity key length (hex characters of a 32-byte pubkey).
    pub identity_key_len: usize,
    /// Maximum authors per network query; larger sets are chunked.
    pub max_authors_per_query: usize,
    /// Concurrent in-flight chunk queries during activity fetches.
    pub max_concurrent_queries: usize,
    /// How far in the past an activity window start may lie (ms).
    pub max_window_past_ms: i64,
    /// How far in the future an activity window end may lie (ms).
    pub max_window_future_ms: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(10),
            identity_key_len: 64,
            max_authors_per_query: 100,
            max_concurrent_queries: 4,
            max_window_past_ms: MAX_WINDOW_PAST_MS,
            max_window_future_ms: MAX_WINDOW_FUTURE_MS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();
        Self {
            query_timeout: env_u64("RUNCLUB_QUERY_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.query_timeout),
            identity_key_len: env_u64("RUNCLUB_IDENTITY_KEY_LEN")
                .map(|v| v as usize)
                .unwrap_or(defaults.identity_key_len),
            max_authors_per_query: env_u64("RUNCLUB_MAX_AUTHORS_PER_QUERY")
                .map(|v| v as usize)
                .unwrap_or(defaults.max_authors_per_query),
            max_concurrent_queries: env_u64("RUNCLUB_MAX_CONCURRENT_QUERIES")
                .map(|v| v as usize)
                .unwrap_or(defaults.max_concurrent_queries),
            max_window_past_ms: env_u64("RUNCLUB_MAX_WINDOW_PAST_DAYS")
                .map(|days| days as i64 * DAY_MS)
                .unwrap_or(defaults.max_window_past_ms),
            max_window_future_ms: env_u64("RUNCLUB_MAX_WINDOW_FUTURE_DAYS")
                .map(|days| days as i64 * DAY_MS)
                .unwrap_or(defaults.max_window_future_ms),
        }
    }
}

fn env_u64(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.query_timeout, Duration::from_secs(10));
        assert_eq!(config.identity_key_len, 64);
        assert!(config.max_authors_per_query > 0);
    }

    #[test]
    fn test_from_env_override() {
        env::set_var("RUNCLUB_QUERY_TIMEOUT_SECS", "12");
        let config = Config::from_env();
        assert_eq!(config.query_timeout, Duration::from_secs(12));
        env::remove_var("RUNCLUB_QUERY_TIMEOUT_SECS");
    }

    #[test]
    fn test_window_bounds_from_env() {
        env::set_var("RUNCLUB_MAX_WINDOW_PAST_DAYS", "30");
        env::set_var("RUNCLUB_MAX_WINDOW_FUTURE_DAYS", "7");
        let config = Config::from_env();
        assert_eq!(config.max_window_past_ms, 30 * DAY_MS);
        assert_eq!(config.max_window_future_ms, 7 * DAY_MS);
        env::remove_var("RUNCLUB_MAX_WINDOW_PAST_DAYS");
        env::remove_var("RUNCLUB_MAX_WINDOW_FUTURE_DAYS");
    }
}
