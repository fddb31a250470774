//! Runtime configuration

use std::path::PathBuf;
use std::time::Duration;

use ookstats_client::{HttpShardSource, DEFAULT_SHARD_LIMIT};

use crate::error::{AppError, Result};

pub const ENV_BASE_URL: &str = "OOKSTATS_BASE_URL";
pub const ENV_CACHE_DIR: &str = "OOKSTATS_CACHE_DIR";
pub const ENV_DEBOUNCE_MS: &str = "OOKSTATS_DEBOUNCE_MS";
pub const ENV_SHARD_LIMIT: &str = "OOKSTATS_SHARD_LIMIT";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "OOKSTATS_CONNECT_TIMEOUT_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "OOKSTATS_REQUEST_TIMEOUT_SECS";

/// Configuration for the player search service and controller
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Site serving `/api/search/players-NNN.json`
    pub base_url: String,

    /// Directory holding the cached player list
    pub cache_dir: PathBuf,

    /// Quiet period before a typed query runs
    pub debounce: Duration,

    /// Shard size assumed when shard 000 does not declare one
    pub shard_limit: u64,

    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4321".to_string(),
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("ookstats"),
            debounce: Duration::from_millis(300),
            shard_limit: DEFAULT_SHARD_LIMIT,
            connect_timeout: HttpShardSource::DEFAULT_CONNECT_TIMEOUT,
            request_timeout: HttpShardSource::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl SearchConfig {
    /// Defaults overridden by `OOKSTATS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(dir) = lookup(ENV_CACHE_DIR) {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(ms) = lookup(ENV_DEBOUNCE_MS) {
            config.debounce = Duration::from_millis(parse_number(ENV_DEBOUNCE_MS, &ms)?);
        }
        if let Some(limit) = lookup(ENV_SHARD_LIMIT) {
            config.shard_limit = parse_number(ENV_SHARD_LIMIT, &limit)?;
            if config.shard_limit == 0 {
                return Err(AppError::Config(format!("{} must be positive", ENV_SHARD_LIMIT)));
            }
        }
        if let Some(secs) = lookup(ENV_CONNECT_TIMEOUT_SECS) {
            config.connect_timeout =
                Duration::from_secs(parse_number(ENV_CONNECT_TIMEOUT_SECS, &secs)?);
        }
        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout =
                Duration::from_secs(parse_number(ENV_REQUEST_TIMEOUT_SECS, &secs)?);
        }

        Ok(config)
    }
}

fn parse_number(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{}={:?}: {}", name, value, e)))
}
