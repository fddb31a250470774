//! ookstats Client - Fetching the sharded player search index
//!
//! This crate provides:
//! - The `ShardSource` abstraction over numbered `players-NNN.json` resources
//! - HTTP, directory and in-memory sources
//! - `ShardPlan`, derived from shard 000's metadata
//! - `ShardFetcher`, the bootstrap and follow-up shard requests

pub mod error;
pub mod fetcher;
pub mod plan;
pub mod source;

pub use error::*;
pub use fetcher::*;
pub use plan::*;
pub use source::*;
