//! Player list cache - persists the merged shard list between sessions

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use ookstats_core::{CacheEnvelope, PlayerRecord};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::CacheStorage;

/// State of the cache entry as seen by `PlayerCache::inspect`
#[derive(Debug, Clone, PartialEq)]
pub enum CacheStatus {
    /// No entry stored
    Missing,

    /// Usable entry
    Fresh { players: usize, age: Duration },

    /// Parsable but older than the freshness window
    Stale { players: usize, age: Duration },

    /// Unparsable or holding an empty player list
    Corrupt,
}

/// Cache of the merged player list under a single storage key
///
/// Stale or corrupt entries are never partially trusted: `load` deletes them
/// and reports a miss. Writes are best effort and never fail the caller.
pub struct PlayerCache {
    storage: Arc<dyn CacheStorage>,
    key: String,
}

impl PlayerCache {
    /// Storage key used by the site
    pub const DEFAULT_KEY: &'static str = "playerSearchIndex";

    /// Create a cache over `storage` using the default key
    pub fn new(storage: Arc<dyn CacheStorage>) -> Self {
        Self::with_key(storage, Self::DEFAULT_KEY)
    }

    /// Create a cache over `storage` using a custom key
    pub fn with_key(storage: Arc<dyn CacheStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load a fresh envelope, if any
    pub async fn load(&self) -> Option<CacheEnvelope> {
        self.load_at(Utc::now()).await
    }

    /// Load a fresh envelope relative to `now`
    pub async fn load_at(&self, now: DateTime<Utc>) -> Option<CacheEnvelope> {
        let raw = match self.storage.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e @ StoreError::InvalidEncoding(_)) => {
                info!("Player cache unreadable ({}); discarding", e);
                self.discard().await;
                return None;
            }
            Err(e) => {
                debug!("Player cache read failed: {}", e);
                return None;
            }
        };

        let envelope = match serde_json::from_str::<CacheEnvelope>(&raw) {
            Ok(envelope) if !envelope.players.is_empty() => envelope,
            Ok(_) => {
                info!("Player cache present but empty; discarding");
                self.discard().await;
                return None;
            }
            Err(e) => {
                info!("Player cache unreadable ({}); discarding", e);
                self.discard().await;
                return None;
            }
        };

        if envelope.is_fresh_at(now) {
            debug!(
                "Player cache hit: {} players, cached at {}",
                envelope.players.len(),
                envelope.metadata.cached_at
            );
            Some(envelope)
        } else {
            info!(
                "Player cache stale (cached at {}); discarding",
                envelope.metadata.cached_at
            );
            self.discard().await;
            None
        }
    }

    /// Store `players`, stamped with the current time
    pub async fn save(&self, players: &[PlayerRecord], total_players: u64) -> bool {
        self.save_at(players, total_players, Utc::now()).await
    }

    /// Store `players`, stamped with `now`; returns whether the write landed
    pub async fn save_at(
        &self,
        players: &[PlayerRecord],
        total_players: u64,
        now: DateTime<Utc>,
    ) -> bool {
        match self.try_save(players, total_players, now).await {
            Ok(bytes) => {
                debug!("Cached {} players ({} bytes)", players.len(), bytes);
                true
            }
            Err(e) => {
                debug!("Player cache write skipped: {}", e);
                false
            }
        }
    }

    /// Remove the entry
    pub async fn clear(&self) -> Result<()> {
        self.storage.remove(&self.key).await
    }

    /// Describe the entry without modifying it
    pub async fn inspect(&self) -> Result<CacheStatus> {
        self.inspect_at(Utc::now()).await
    }

    pub async fn inspect_at(&self, now: DateTime<Utc>) -> Result<CacheStatus> {
        let raw = match self.storage.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(CacheStatus::Missing),
            Err(StoreError::InvalidEncoding(_)) => return Ok(CacheStatus::Corrupt),
            Err(e) => return Err(e),
        };

        let status = match serde_json::from_str::<CacheEnvelope>(&raw) {
            Ok(envelope) if envelope.players.is_empty() => CacheStatus::Corrupt,
            Ok(envelope) => {
                let players = envelope.players.len();
                let age = envelope.age_at(now);
                if envelope.is_fresh_at(now) {
                    CacheStatus::Fresh { players, age }
                } else {
                    CacheStatus::Stale { players, age }
                }
            }
            Err(_) => CacheStatus::Corrupt,
        };
        Ok(status)
    }

    async fn try_save(
        &self,
        players: &[PlayerRecord],
        total_players: u64,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let envelope = CacheEnvelope::new(players.to_vec(), total_players, now);
        let json = serde_json::to_string(&envelope)?;
        self.storage.set(&self.key, &json).await?;
        Ok(json.len())
    }

    async fn discard(&self) {
        if let Err(e) = self.storage.remove(&self.key).await {
            debug!("Failed to remove player cache entry: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileStorage, MemoryStorage};
    use ookstats_core::Region;
    use tempfile::tempdir;

    fn players() -> Vec<PlayerRecord> {
        vec![
            PlayerRecord::new(1, "Thrall", "og", "Og", Region::Us),
            PlayerRecord::new(2, "Jaina", "theramore", "Theramore", Region::Eu),
        ]
    }

    fn cache_over(storage: &Arc<MemoryStorage>) -> PlayerCache {
        PlayerCache::new(storage.clone())
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = cache_over(&storage);

        assert!(cache.save(&players(), 2).await);
        let envelope = cache.load().await.unwrap();
        assert_eq!(envelope.players, players());
        assert_eq!(envelope.metadata.total_players, 2);
    }

    #[tokio::test]
    async fn test_freshness_boundary() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = cache_over(&storage);
        let now = Utc::now();

        cache
            .save_at(&players(), 2, now - Duration::hours(23) - Duration::minutes(59))
            .await;
        assert!(cache.load_at(now).await.is_some());

        cache
            .save_at(&players(), 2, now - Duration::hours(24) - Duration::milliseconds(1))
            .await;
        assert!(cache.load_at(now).await.is_none());
        assert!(storage.is_empty().await, "stale entry should be removed");
    }

    #[tokio::test]
    async fn test_empty_players_self_heals() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = cache_over(&storage);

        cache.save(&[], 0).await;
        assert!(cache.load().await.is_none());
        assert!(storage.get(PlayerCache::DEFAULT_KEY).await.unwrap().is_none());
        assert!(cache.load().await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_json_self_heals() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(PlayerCache::DEFAULT_KEY, "{not json")
            .await
            .unwrap();
        let cache = cache_over(&storage);

        assert_eq!(cache.inspect().await.unwrap(), CacheStatus::Corrupt);
        assert!(cache.load().await.is_none());
        assert_eq!(cache.inspect().await.unwrap(), CacheStatus::Missing);
    }

    #[tokio::test]
    async fn test_non_utf8_file_self_heals() {
        let dir = tempdir().unwrap();
        let entry = dir.path().join("playerSearchIndex.json");
        std::fs::write(&entry, [0xff, 0xfe, 0x00, 0x7b]).unwrap();
        let cache = PlayerCache::new(Arc::new(FileStorage::new(dir.path())));

        assert_eq!(cache.inspect().await.unwrap(), CacheStatus::Corrupt);
        assert!(cache.load().await.is_none());
        assert!(!entry.exists(), "undecodable entry should be removed");
        assert_eq!(cache.inspect().await.unwrap(), CacheStatus::Missing);
    }

    #[tokio::test]
    async fn test_quota_failure_is_swallowed() {
        let storage = Arc::new(MemoryStorage::with_quota(16));
        let cache = cache_over(&storage);

        assert!(!cache.save(&players(), 2).await);
        assert!(cache.load().await.is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_entry() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = cache_over(&storage);

        cache.save(&players(), 2).await;
        cache.save(&players()[..1], 1).await;
        assert_eq!(cache.load().await.unwrap().players.len(), 1);
    }

    #[tokio::test]
    async fn test_inspect_reports_stale_without_removing() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = cache_over(&storage);
        let now = Utc::now();

        cache.save_at(&players(), 2, now - Duration::hours(30)).await;
        assert!(matches!(
            cache.inspect_at(now).await.unwrap(),
            CacheStatus::Stale { players: 2, .. }
        ));
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_file_backed_cache() {
        let dir = tempdir().unwrap();
        let cache = PlayerCache::new(Arc::new(FileStorage::new(dir.path())));

        cache.save(&players(), 2).await;
        assert_eq!(cache.load().await.unwrap().players.len(), 2);

        cache.clear().await.unwrap();
        assert_eq!(cache.inspect().await.unwrap(), CacheStatus::Missing);
    }
}
