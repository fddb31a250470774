//! ookstats App - Player search service and query controller
//!
//! This crate wires the lower layers together:
//! - `PlayerSearchService`: cache-first, shard-by-shard index loading with
//!   snapshots published over a watch channel
//! - `QueryController`: debounced queries, keyboard and pointer navigation
//! - `render`: the results panel view model
//! - `SearchConfig`: defaults plus `OOKSTATS_*` environment overrides

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod render;
pub mod service;

pub use config::*;
pub use controller::*;
pub use debounce::*;
pub use error::*;
pub use render::*;
pub use service::*;
