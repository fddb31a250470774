//! Error types for ookstats-client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Shard {shard} returned status {status}")]
    Status { shard: u32, status: u16 },

    #[error("Shard {0} not found")]
    NotFound(u32),

    #[error("Shard {0} contained no players")]
    EmptyShard(u32),

    #[error("Failed to decode shard {shard}: {source}")]
    Decode {
        shard: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
