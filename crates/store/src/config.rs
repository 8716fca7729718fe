//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults reproduce the behavior the
//! service shipped with (page size 5, five highlighted posts, 5-minute
//! cache entries).
//!
//! - `STORE_PAGE_SIZE` - Items per feed/response page (default: 5, must be > 0)
//! - `STORE_TOP_POSTS_LIMIT` - Posts in the highlights view (default: 5)
//! - `STORE_CACHE_TTL_SECS` - Cache entry time-to-live (default: 300)
//! - `STORE_CACHE_CAPACITY` - Max entries in the in-process cache (default: 1000)

use std::num::NonZeroUsize;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PAGE_SIZE: usize = 5;
const DEFAULT_TOP_POSTS_LIMIT: usize = 5;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store service configuration.
///
/// Page size used to be a hard-coded constant buried in the service; it is
/// threaded through every pagination call from here instead.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Items per page for the community feed and response threads.
    pub page_size: NonZeroUsize,
    /// Number of posts returned by the highlights view.
    pub top_posts_limit: usize,
    /// Time-to-live for cache entries written by the in-process cache.
    pub cache_ttl: Duration,
    /// Maximum number of entries held by the in-process cache.
    pub cache_capacity: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
            top_posts_limit: DEFAULT_TOP_POSTS_LIMIT,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed
    /// (non-numeric, or a zero page size).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = get_optional_env("STORE_PAGE_SIZE") {
            config.page_size = raw
                .parse::<NonZeroUsize>()
                .map_err(|e| ConfigError::InvalidEnvVar("STORE_PAGE_SIZE".to_string(), e.to_string()))?;
        }
        if let Some(raw) = get_optional_env("STORE_TOP_POSTS_LIMIT") {
            config.top_posts_limit = raw.parse::<usize>().map_err(|e| {
                ConfigError::InvalidEnvVar("STORE_TOP_POSTS_LIMIT".to_string(), e.to_string())
            })?;
        }
        if let Some(raw) = get_optional_env("STORE_CACHE_TTL_SECS") {
            let secs = raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("STORE_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(raw) = get_optional_env("STORE_CACHE_CAPACITY") {
            config.cache_capacity = raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("STORE_CACHE_CAPACITY".to_string(), e.to_string())
            })?;
        }

        Ok(config)
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
