//! Error types for ookstats-app

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Client error: {0}")]
    Client(#[from] ookstats_client::ClientError),

    #[error("Store error: {0}")]
    Store(#[from] ookstats_store::StoreError),

    #[error("Search error: {0}")]
    Search(#[from] ookstats_search::SearchError),
}

pub type Result<T> = std::result::Result<T, AppError>;
