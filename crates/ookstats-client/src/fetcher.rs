//! Bootstrap and follow-up shard requests

use std::sync::Arc;

use ookstats_core::PlayerRecord;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::plan::{ShardPlan, DEFAULT_SHARD_LIMIT};
use crate::source::ShardSource;

/// Shard 000 together with the plan it implies
#[derive(Debug, Clone)]
pub struct FirstShard {
    pub players: Vec<PlayerRecord>,
    pub plan: ShardPlan,
}

/// Fetches shards from a source in the order the index loader needs them
#[derive(Clone)]
pub struct ShardFetcher {
    source: Arc<dyn ShardSource>,
    default_limit: u64,
}

impl ShardFetcher {
    pub fn new(source: Arc<dyn ShardSource>) -> Self {
        Self {
            source,
            default_limit: DEFAULT_SHARD_LIMIT,
        }
    }

    /// Shard size assumed when shard 000 carries no `limit`
    pub fn with_default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn source(&self) -> &Arc<dyn ShardSource> {
        &self.source
    }

    /// Fetch shard 000 and derive the plan from its metadata
    pub async fn fetch_first(&self) -> Result<FirstShard> {
        let payload = self.source.fetch_shard(0).await?;
        let plan = ShardPlan::from_first(&payload, self.default_limit);
        debug!(
            "Shard 000: {} players, {} expected across {} shards",
            plan.first_len, plan.total_expected, plan.total_shards
        );

        Ok(FirstShard {
            players: payload.players,
            plan,
        })
    }

    /// Fetch follow-up shard `shard`; an empty shard is an error so loading stops
    pub async fn fetch_next(&self, shard: u32) -> Result<Vec<PlayerRecord>> {
        let payload = self.source.fetch_shard(shard).await?;
        if payload.players.is_empty() {
            return Err(ClientError::EmptyShard(shard));
        }
        debug!("Shard {:03}: {} players", shard, payload.players.len());
        Ok(payload.players)
    }
}
