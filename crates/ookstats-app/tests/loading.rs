//! Index loading across cache, bootstrap shard and follow-up shards

mod common;

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use common::*;
use ookstats_app::LoadStatus;
use ookstats_client::StaticShardSource;
use ookstats_core::ShardPayload;
use ookstats_store::{CacheStorage, MemoryStorage, PlayerCache};

#[tokio::test(start_paused = true)]
async fn test_snapshots_only_grow() {
    let source = Arc::new(SlowSource {
        inner: StaticShardSource::new(numbered_shards(5, 2)),
    });
    let service = service_over(source, Arc::new(MemoryStorage::new()));
    let mut updates = service.subscribe();

    let collector = tokio::spawn(async move {
        let mut sizes: Vec<usize> = Vec::new();
        while updates.changed().await.is_ok() {
            let update = updates.borrow_and_update().clone();
            if let Some(snapshot) = update.snapshot {
                if sizes.last() != Some(&snapshot.len()) {
                    sizes.push(snapshot.len());
                }
            }
            if update.status == LoadStatus::Complete {
                break;
            }
        }
        sizes
    });

    service.ensure_loaded().unwrap().await.unwrap();
    let sizes = collector.await.unwrap();

    // Rebuilds after shard 000, then shards 2 and 4
    assert_eq!(sizes, vec![2, 6, 10]);
    assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(service.snapshot().unwrap().len(), 10);
}

#[tokio::test]
async fn test_failed_shard_stops_loading_early() {
    let source = Arc::new(StaticShardSource::new(numbered_shards(4, 2)).failing_at(2));
    let storage = Arc::new(MemoryStorage::new());
    let service = service_over(source.clone(), storage.clone());

    service.load().await;

    assert_eq!(source.requests().await, vec![0, 1, 2]);
    assert_eq!(service.player_count().await, 4);
    assert_eq!(service.status(), LoadStatus::Complete);

    // Shard 001 arrived after the last scheduled rebuild but is still searchable
    assert_eq!(service.search("P3")[0].record.id, 3);

    let cached = PlayerCache::new(storage).load().await.unwrap();
    assert_eq!(cached.players.len(), 4);
    assert_eq!(cached.metadata.total_players, 4);
}

#[tokio::test]
async fn test_empty_shard_stops_loading_early() {
    let mut shards = numbered_shards(4, 2);
    shards[2] = ShardPayload::default();
    let source = Arc::new(StaticShardSource::new(shards));
    let service = service_over(source.clone(), Arc::new(MemoryStorage::new()));

    service.load().await;

    assert_eq!(source.requests().await, vec![0, 1, 2]);
    assert_eq!(service.snapshot().unwrap().len(), 4);
}

#[tokio::test]
async fn test_cache_freshness_boundary() {
    let storage = Arc::new(MemoryStorage::new());
    let cache = PlayerCache::new(storage.clone());
    let almost_stale = Utc::now() - ChronoDuration::hours(24) + ChronoDuration::minutes(5);
    cache.save_at(&[player(42, "Cached")], 1, almost_stale).await;

    let source = Arc::new(StaticShardSource::new(numbered_shards(1, 2)));
    let service = service_over(source.clone(), storage.clone());
    service.load().await;

    assert!(source.requests().await.is_empty());
    assert_eq!(service.search("cached")[0].record.id, 42);

    let stale = Utc::now() - ChronoDuration::hours(24) - ChronoDuration::seconds(1);
    cache.save_at(&[player(42, "Cached")], 1, stale).await;

    let source = Arc::new(StaticShardSource::new(numbered_shards(1, 2)));
    let service = service_over(source.clone(), storage);
    service.load().await;

    assert_eq!(source.requests().await, vec![0]);
    assert!(service.search("cached").is_empty());
    assert_eq!(service.player_count().await, 2);
}

#[tokio::test]
async fn test_corrupt_cache_is_replaced() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .set(PlayerCache::DEFAULT_KEY, "{\"players\": [oops")
        .await
        .unwrap();

    let source = Arc::new(StaticShardSource::new(numbered_shards(1, 3)));
    let service = service_over(source.clone(), storage.clone());
    service.load().await;

    assert_eq!(source.requests().await, vec![0]);
    assert_eq!(service.player_count().await, 3);

    let cached = PlayerCache::new(storage).load().await.unwrap();
    assert_eq!(cached.players.len(), 3);
    assert_eq!(cached.metadata.total_players, 3);
}

#[tokio::test]
async fn test_failed_bootstrap_publishes_no_snapshot() {
    let source = Arc::new(StaticShardSource::new(numbered_shards(2, 2)).failing_at(0));
    let storage = Arc::new(MemoryStorage::new());
    let service = service_over(source, storage.clone());

    service.ensure_loaded().unwrap().await.unwrap();

    assert_eq!(service.status(), LoadStatus::Failed);
    assert!(service.snapshot().is_none());
    assert!(service.search("P1").is_empty());
    assert!(storage.is_empty().await);
}

#[tokio::test]
async fn test_queries_are_idempotent() {
    let source = Arc::new(StaticShardSource::new(numbered_shards(3, 10)));
    let service = service_over(source, Arc::new(MemoryStorage::new()));
    service.load().await;

    let first = service.search("P1");
    let second = service.search("P1");
    assert!(!first.is_empty());
    assert_eq!(first, second);
}
