//! Shard plan derived from the first shard

use ookstats_core::ShardPayload;

/// Players per shard when shard 000 does not say
pub const DEFAULT_SHARD_LIMIT: u64 = 1000;

/// How many shards to expect and when to rebuild the index while loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardPlan {
    /// Players the site claims to have
    pub total_expected: u64,

    /// Players per shard
    pub shard_size: u64,

    /// Number of shards including 000
    pub total_shards: u32,

    /// Players actually present in shard 000
    pub first_len: u64,
}

impl ShardPlan {
    /// Plan from shard 000
    ///
    /// A missing or zero `total_players` means shard 000 is all there is.
    pub fn from_first(first: &ShardPayload, default_limit: u64) -> Self {
        let first_len = first.players.len() as u64;
        let total_expected = match first.metadata.total_players {
            Some(total) if total > 0 => total,
            _ => first_len,
        };
        let shard_size = first
            .metadata
            .limit
            .filter(|limit| *limit > 0)
            .unwrap_or(default_limit)
            .max(1);
        let total_shards = u32::try_from(total_expected.div_ceil(shard_size)).unwrap_or(u32::MAX);

        Self {
            total_expected,
            shard_size,
            total_shards,
            first_len,
        }
    }

    /// Whether shards past 000 should be requested
    pub fn needs_more(&self) -> bool {
        self.total_expected > self.first_len
    }

    /// Follow-up shard indexes, in request order
    pub fn remaining(&self) -> std::ops::Range<u32> {
        if self.needs_more() {
            1..self.total_shards
        } else {
            1..1
        }
    }

    /// Whether the index is rebuilt after appending shard `shard`
    pub fn should_rebuild_after(&self, shard: u32) -> bool {
        shard % 2 == 0 || shard + 1 == self.total_shards
    }
}
