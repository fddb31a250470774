//! Player search service
//!
//! Owns the append-only player list and publishes successive index snapshots
//! while shards arrive. Consumers read the latest snapshot or subscribe to
//! updates through a watch channel.

use std::sync::Arc;

use ookstats_client::{HttpShardSource, ShardFetcher, ShardPlan};
use ookstats_core::PlayerRecord;
use ookstats_search::{
    autocomplete_players, AutocompleteChoice, AutocompleteRequest, PlayerMatch,
    SearchIndexSnapshot, SearchOptions,
};
use ookstats_store::{FileStorage, PlayerCache};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::error::Result;

/// Where the index load currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    NotStarted,
    Loading,
    Partial { loaded: usize, expected: u64 },
    Complete,
    Failed,
}

impl LoadStatus {
    /// Whether a load may be started from this state
    pub fn can_start(&self) -> bool {
        matches!(self, LoadStatus::NotStarted | LoadStatus::Failed)
    }
}

/// Value published on every snapshot or status change
#[derive(Debug, Clone)]
pub struct IndexUpdate {
    pub snapshot: Option<Arc<SearchIndexSnapshot>>,
    pub status: LoadStatus,
}

impl Default for IndexUpdate {
    fn default() -> Self {
        Self {
            snapshot: None,
            status: LoadStatus::NotStarted,
        }
    }
}

/// Incrementally loaded, cached fuzzy search over all players
pub struct PlayerSearchService {
    players: RwLock<Vec<PlayerRecord>>,
    updates: watch::Sender<IndexUpdate>,
    cache: PlayerCache,
    fetcher: ShardFetcher,
    options: SearchOptions,
}

impl PlayerSearchService {
    pub fn new(cache: PlayerCache, fetcher: ShardFetcher, options: SearchOptions) -> Result<Self> {
        options.validate()?;
        let (updates, _) = watch::channel(IndexUpdate::default());

        Ok(Self {
            players: RwLock::new(Vec::new()),
            updates,
            cache,
            fetcher,
            options,
        })
    }

    /// Service over the HTTP site and file cache named by `config`
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let source = HttpShardSource::with_timeouts(
            &config.base_url,
            config.connect_timeout,
            config.request_timeout,
        )?;
        let fetcher = ShardFetcher::new(Arc::new(source)).with_default_limit(config.shard_limit);
        let cache = PlayerCache::new(Arc::new(FileStorage::new(&config.cache_dir)));

        Self::new(cache, fetcher, SearchOptions::default())
    }

    /// Start loading in the background unless a load is running or done
    ///
    /// A failed bootstrap leaves the service restartable, so the next call
    /// retries.
    pub fn ensure_loaded(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let started = self.updates.send_if_modified(|update| {
            if update.status.can_start() {
                update.status = LoadStatus::Loading;
                true
            } else {
                false
            }
        });
        if !started {
            return None;
        }

        let service = Arc::clone(self);
        Some(tokio::spawn(async move { service.load().await }))
    }

    /// Load the index: cache first, then shard 000, then the rest in order
    pub async fn load(&self) {
        self.set_status(LoadStatus::Loading);

        if let Some(envelope) = self.cache.load().await {
            info!("Using cached player index: {} players", envelope.players.len());
            *self.players.write().await = envelope.players;
            self.rebuild(LoadStatus::Complete).await;
            return;
        }

        let first = match self.fetcher.fetch_first().await {
            Ok(first) => first,
            Err(e) => {
                warn!("Failed to load player index: {}", e);
                self.set_status(LoadStatus::Failed);
                return;
            }
        };
        let plan = first.plan;
        *self.players.write().await = first.players;

        if !plan.needs_more() {
            self.rebuild(LoadStatus::Complete).await;
            self.save(plan.total_expected).await;
            return;
        }

        self.rebuild(self.partial_status(&plan).await).await;
        let mut unindexed = false;

        for shard in plan.remaining() {
            match self.fetcher.fetch_next(shard).await {
                Ok(chunk) => {
                    self.players.write().await.extend(chunk);
                    unindexed = true;
                }
                Err(e) => {
                    warn!("Stopped loading player shards at {:03}: {}", shard, e);
                    break;
                }
            }

            if plan.should_rebuild_after(shard) {
                self.rebuild(self.partial_status(&plan).await).await;
                unindexed = false;
            }
        }

        if unindexed {
            self.rebuild(LoadStatus::Complete).await;
        } else {
            self.set_status(LoadStatus::Complete);
        }

        let loaded = self.player_count().await as u64;
        info!("Player index loaded: {} of {} players", loaded, plan.total_expected);
        self.save(loaded).await;
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Option<Arc<SearchIndexSnapshot>> {
        self.updates.borrow().snapshot.clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.updates.borrow().status
    }

    /// Query the latest snapshot; nothing matches before the first one
    pub fn search(&self, query: &str) -> Vec<PlayerMatch> {
        self.snapshot()
            .map(|snapshot| snapshot.search(query))
            .unwrap_or_default()
    }

    /// Receive every snapshot and status change
    pub fn subscribe(&self) -> watch::Receiver<IndexUpdate> {
        self.updates.subscribe()
    }

    /// Players loaded so far
    pub async fn player_count(&self) -> usize {
        self.players.read().await.len()
    }

    pub async fn autocomplete(&self, request: &AutocompleteRequest) -> Vec<AutocompleteChoice> {
        autocomplete_players(&self.players.read().await, request)
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    async fn partial_status(&self, plan: &ShardPlan) -> LoadStatus {
        LoadStatus::Partial {
            loaded: self.player_count().await,
            expected: plan.total_expected,
        }
    }

    /// Build a snapshot over the current list and publish it with `status`
    async fn rebuild(&self, status: LoadStatus) {
        let players = self.players.read().await;
        match SearchIndexSnapshot::build(&players, &self.options) {
            Ok(snapshot) => {
                debug!("Publishing search snapshot over {} players", snapshot.len());
                self.updates.send_replace(IndexUpdate {
                    snapshot: Some(Arc::new(snapshot)),
                    status,
                });
            }
            Err(e) => {
                warn!("Failed to build search index: {}", e);
                self.set_status(status);
            }
        }
    }

    fn set_status(&self, status: LoadStatus) {
        self.updates.send_if_modified(|update| {
            if update.status == status {
                false
            } else {
                update.status = status;
                true
            }
        });
    }

    async fn save(&self, total_players: u64) {
        let players = self.players.read().await;
        self.cache.save(&players, total_players).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ookstats_client::StaticShardSource;
    use ookstats_core::{Region, ShardMetadata, ShardPayload};
    use ookstats_store::MemoryStorage;

    fn shard(names: &[&str], total: Option<u64>, limit: Option<u64>) -> ShardPayload {
        ShardPayload {
            players: names
                .iter()
                .enumerate()
                .map(|(i, name)| PlayerRecord::new(i as i64, *name, "og", "Og", Region::Us))
                .collect(),
            metadata: ShardMetadata {
                total_players: total,
                limit,
                ..ShardMetadata::default()
            },
        }
    }

    fn service(source: Arc<StaticShardSource>, storage: Arc<MemoryStorage>) -> Arc<PlayerSearchService> {
        let service = PlayerSearchService::new(
            PlayerCache::new(storage),
            ShardFetcher::new(source),
            SearchOptions::default(),
        )
        .unwrap();
        Arc::new(service)
    }

    #[tokio::test]
    async fn test_single_shard_load() {
        let source = Arc::new(StaticShardSource::new(vec![shard(
            &["Thrall", "Jaina"],
            Some(2),
            Some(1000),
        )]));
        let storage = Arc::new(MemoryStorage::new());
        let service = service(source.clone(), storage.clone());

        assert!(service.search("thral").is_empty());
        service.load().await;

        assert_eq!(service.status(), LoadStatus::Complete);
        assert_eq!(service.search("thral").len(), 1);
        assert_eq!(source.requests().await, vec![0]);
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_bootstrap_can_retry() {
        let source = Arc::new(StaticShardSource::new(vec![shard(&["Thrall"], None, None)]).failing_at(0));
        let service = service(source, Arc::new(MemoryStorage::new()));

        service.ensure_loaded().unwrap().await.unwrap();
        assert_eq!(service.status(), LoadStatus::Failed);
        assert!(service.snapshot().is_none());

        assert!(service.ensure_loaded().is_some());
    }

    #[tokio::test]
    async fn test_ensure_loaded_is_idempotent() {
        let source = Arc::new(StaticShardSource::new(vec![shard(&["Thrall"], None, None)]));
        let service = service(source.clone(), Arc::new(MemoryStorage::new()));

        let handle = service.ensure_loaded().unwrap();
        assert!(service.ensure_loaded().is_none());
        handle.await.unwrap();
        assert!(service.ensure_loaded().is_none());
        assert_eq!(source.requests().await, vec![0]);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_shards() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = PlayerCache::new(storage.clone());
        cache
            .save(&[PlayerRecord::new(7, "Anduin", "og", "Og", Region::Eu)], 1)
            .await;

        let source = Arc::new(StaticShardSource::new(Vec::new()));
        let service = service(source.clone(), storage);
        service.load().await;

        assert_eq!(service.status(), LoadStatus::Complete);
        assert_eq!(service.search("anduin")[0].record.id, 7);
        assert!(source.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_autocomplete_uses_loaded_players() {
        let source = Arc::new(StaticShardSource::new(vec![shard(
            &["Thrall", "Thrallbro", "Jaina"],
            None,
            None,
        )]));
        let service = service(source, Arc::new(MemoryStorage::new()));
        service.load().await;

        let choices = service.autocomplete(&AutocompleteRequest::new("thr")).await;
        assert_eq!(choices.len(), 2);
        assert_eq!(service.player_count().await, 3);
    }
}
