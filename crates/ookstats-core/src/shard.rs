//! Shard and cache envelope types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::PlayerRecord;

/// One numbered slice of the static player index (`players-NNN.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShardPayload {
    /// Players in this shard
    #[serde(default)]
    pub players: Vec<PlayerRecord>,

    /// Shard metadata, authoritative only in shard 000
    #[serde(default)]
    pub metadata: ShardMetadata,
}

/// Metadata emitted by the index generator alongside each shard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShardMetadata {
    /// Total players across all shards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_players: Option<u64>,

    /// Shard size the generator used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Players in this particular shard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_players: Option<u64>,

    /// Offset of the first player in this shard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Generation time, as written by the generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// The merged player list as persisted in local durable storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEnvelope {
    pub players: Vec<PlayerRecord>,
    pub metadata: CacheMetadata,
}

/// Metadata stored with a cached player list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub total_players: u64,

    /// When the envelope was written (ISO-8601)
    pub cached_at: DateTime<Utc>,
}

impl CacheEnvelope {
    /// How long a cached envelope stays usable
    pub const MAX_AGE_HOURS: i64 = 24;

    /// Create an envelope stamped with `cached_at`
    pub fn new(players: Vec<PlayerRecord>, total_players: u64, cached_at: DateTime<Utc>) -> Self {
        Self {
            players,
            metadata: CacheMetadata {
                total_players,
                cached_at,
            },
        }
    }

    /// Maximum age as a chrono duration
    pub fn max_age() -> Duration {
        Duration::hours(Self::MAX_AGE_HOURS)
    }

    /// Age of the envelope relative to `now`
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now - self.metadata.cached_at
    }

    /// Fresh iff `now - cached_at < 24h`
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.age_at(now) < Self::max_age()
    }
}
