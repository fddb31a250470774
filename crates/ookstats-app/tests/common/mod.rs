#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ookstats_app::PlayerSearchService;
use ookstats_client::{ClientError, ShardFetcher, ShardSource, StaticShardSource};
use ookstats_core::{PlayerRecord, Region, ShardMetadata, ShardPayload};
use ookstats_search::SearchOptions;
use ookstats_store::{CacheStorage, MemoryStorage, PlayerCache};

/// Simulated latency of every shard request
pub const SHARD_LATENCY: Duration = Duration::from_millis(50);

/// Static shards that take `SHARD_LATENCY` to arrive
pub struct SlowSource {
    pub inner: StaticShardSource,
}

#[async_trait]
impl ShardSource for SlowSource {
    async fn fetch_shard(&self, shard: u32) -> Result<ShardPayload, ClientError> {
        tokio::time::sleep(SHARD_LATENCY).await;
        self.inner.fetch_shard(shard).await
    }
}

pub fn player(id: i64, name: &str) -> PlayerRecord {
    PlayerRecord::new(id, name, "og", "Og", Region::Us)
}

/// Shard 000 declaring `total` players in shards of `limit`
pub fn first_shard(players: Vec<PlayerRecord>, total: u64, limit: u64) -> ShardPayload {
    ShardPayload {
        players,
        metadata: ShardMetadata {
            total_players: Some(total),
            limit: Some(limit),
            ..ShardMetadata::default()
        },
    }
}

pub fn shard(players: Vec<PlayerRecord>) -> ShardPayload {
    ShardPayload {
        players,
        metadata: ShardMetadata::default(),
    }
}

/// `count` shards of `size` players named `P<id>`, with shard 000 declaring the total
pub fn numbered_shards(count: usize, size: usize) -> Vec<ShardPayload> {
    let total = (count * size) as u64;
    (0..count)
        .map(|s| {
            let players = (0..size)
                .map(|i| {
                    let id = (s * size + i) as i64;
                    player(id, &format!("P{}", id))
                })
                .collect();
            if s == 0 {
                first_shard(players, total, size as u64)
            } else {
                shard(players)
            }
        })
        .collect()
}

pub fn service_over(
    source: Arc<dyn ShardSource>,
    storage: Arc<MemoryStorage>,
) -> Arc<PlayerSearchService> {
    let storage: Arc<dyn CacheStorage> = storage;
    Arc::new(
        PlayerSearchService::new(
            PlayerCache::new(storage),
            ShardFetcher::new(source),
            SearchOptions::default(),
        )
        .unwrap(),
    )
}
