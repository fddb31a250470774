//! ookstats Search - Fuzzy player search
//!
//! This crate provides:
//! - Location-weighted approximate substring scoring (`fuzzy`)
//! - Immutable, weighted search snapshots over a player list (`index`)
//! - Query options and match types (`query`)
//! - Filtered name lookup for chat-bot autocomplete (`autocomplete`)

pub mod autocomplete;
pub mod error;
pub mod fuzzy;
pub mod index;
pub mod query;

pub use autocomplete::*;
pub use error::*;
pub use index::*;
pub use query::*;
