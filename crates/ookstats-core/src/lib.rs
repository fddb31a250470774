//! ookstats Core - Shared types for the player search index
//!
//! This crate defines the data that flows between the other crates:
//! - `PlayerRecord`: one searchable player identity
//! - `ShardPayload`: one numbered slice of the static player index
//! - `CacheEnvelope`: the merged player list as persisted locally
//! - Path builders for shard resources and player profiles

pub mod class;
pub mod error;
pub mod paths;
pub mod player;
pub mod shard;

pub use class::*;
pub use error::*;
pub use paths::*;
pub use player::*;
pub use shard::*;
