//! Error types for ookstats-search

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid search options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
