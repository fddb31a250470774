//! Shard sources - where numbered player shards come from

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use ookstats_core::{search_shard_path, ShardPayload};
use reqwest::Client;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, Result};

/// A provider of numbered player shards
#[async_trait]
pub trait ShardSource: Send + Sync {
    /// Fetch and decode shard `shard`
    async fn fetch_shard(&self, shard: u32) -> Result<ShardPayload>;
}

/// Shards served over HTTP from the static site
///
/// Shard paths are absolute (`/api/search/players-NNN.json`), so they resolve
/// against the origin of `base_url`.
pub struct HttpShardSource {
    client: Client,
    base_url: Url,
}

impl HttpShardSource {
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a source for the site at `base_url` with default timeouts
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_timeouts(
            base_url,
            Self::DEFAULT_CONNECT_TIMEOUT,
            Self::DEFAULT_REQUEST_TIMEOUT,
        )
    }

    /// Create a source with explicit timeouts
    pub fn with_timeouts(
        base_url: impl AsRef<str>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let base_url: Url = base_url
            .as_ref()
            .parse()
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url.as_ref(), e)))?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Get the site URL
    pub fn url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of shard `shard`
    pub fn shard_url(&self, shard: u32) -> Result<Url> {
        self.base_url
            .join(&search_shard_path(shard))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl ShardSource for HttpShardSource {
    async fn fetch_shard(&self, shard: u32) -> Result<ShardPayload> {
        let url = self.shard_url(shard)?;
        debug!("Fetching shard {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                shard,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode { shard, source })
    }
}

/// Shards read from a directory of generated `players-NNN.json` files
#[derive(Debug, Clone)]
pub struct DirShardSource {
    pub path: PathBuf,
}

impl DirShardSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn shard_path(&self, shard: u32) -> PathBuf {
        self.path.join(format!("players-{:03}.json", shard))
    }
}

#[async_trait]
impl ShardSource for DirShardSource {
    async fn fetch_shard(&self, shard: u32) -> Result<ShardPayload> {
        let path = self.shard_path(shard);
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(ClientError::NotFound(shard)),
            Err(e) => return Err(e.into()),
        };
        debug!("Read shard {} from {:?}", shard, path);
        serde_json::from_slice(&raw).map_err(|source| ClientError::Decode { shard, source })
    }
}

/// Shards held in memory, recording every request
///
/// Useful for exercising the loading sequence without a server.
#[derive(Debug, Default)]
pub struct StaticShardSource {
    shards: Vec<ShardPayload>,
    failing: HashSet<u32>,
    requests: Mutex<Vec<u32>>,
}

impl StaticShardSource {
    pub fn new(shards: Vec<ShardPayload>) -> Self {
        Self {
            shards,
            failing: HashSet::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Make requests for `shard` fail with a server error
    pub fn failing_at(mut self, shard: u32) -> Self {
        self.failing.insert(shard);
        self
    }

    /// Shard indexes requested so far, in request order
    pub async fn requests(&self) -> Vec<u32> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ShardSource for StaticShardSource {
    async fn fetch_shard(&self, shard: u32) -> Result<ShardPayload> {
        self.requests.lock().await.push(shard);

        if self.failing.contains(&shard) {
            return Err(ClientError::Status { shard, status: 500 });
        }
        self.shards
            .get(shard as usize)
            .cloned()
            .ok_or(ClientError::NotFound(shard))
    }
}
