//! ookstats Store - Durable local cache for the player search index
//!
//! This crate provides:
//! - A string key/value storage abstraction (`CacheStorage`)
//! - File-backed and in-memory storage implementations
//! - `PlayerCache`, which persists the merged player list with a freshness stamp

pub mod cache;
pub mod error;
pub mod local;
pub mod memory;

pub use cache::*;
pub use error::*;
pub use local::*;
pub use memory::*;

use async_trait::async_trait;

/// Durable string storage keyed by name, the local equivalent of browser
/// `localStorage`
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
