//! Search options and match types

use std::fmt;

use ookstats_core::PlayerRecord;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::fuzzy::MatchParams;

/// A searchable field of a player record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Name,
    RealmName,
    Region,
    ClassName,
    ActiveSpecName,
}

impl SearchField {
    /// Value of this field on `record`, if present
    pub fn value<'a>(&self, record: &'a PlayerRecord) -> Option<&'a str> {
        match self {
            SearchField::Name => Some(record.name.as_str()),
            SearchField::RealmName => Some(record.realm_name.as_str()),
            SearchField::Region => Some(record.region.as_str()),
            SearchField::ClassName => record.class_name.as_deref(),
            SearchField::ActiveSpecName => record.active_spec_name.as_deref(),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchField::Name => "name",
            SearchField::RealmName => "realm_name",
            SearchField::Region => "region",
            SearchField::ClassName => "class_name",
            SearchField::ActiveSpecName => "active_spec_name",
        };
        f.write_str(name)
    }
}

/// A field together with its relative weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedKey {
    pub field: SearchField,
    pub weight: f64,
}

impl WeightedKey {
    pub const fn new(field: SearchField, weight: f64) -> Self {
        Self { field, weight }
    }
}

/// Index construction and query options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Weighted fields; weights are normalized at build time
    pub keys: Vec<WeightedKey>,

    /// Highest per-field score that still counts as a match
    pub threshold: f64,

    /// Maximum number of matches returned by a query
    pub limit: usize,

    /// Expected match start within a field
    pub location: usize,

    /// Start offset that costs a full error per pattern character
    pub distance: usize,
}

impl SearchOptions {
    /// Name dominates, realm and region follow, class and spec only nudge
    pub const DEFAULT_KEYS: [WeightedKey; 5] = [
        WeightedKey::new(SearchField::Name, 0.6),
        WeightedKey::new(SearchField::RealmName, 0.2),
        WeightedKey::new(SearchField::Region, 0.2),
        WeightedKey::new(SearchField::ClassName, 0.1),
        WeightedKey::new(SearchField::ActiveSpecName, 0.1),
    ];

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_keys(mut self, keys: Vec<WeightedKey>) -> Self {
        self.keys = keys;
        self
    }

    /// Per-field matching parameters
    pub fn match_params(&self) -> MatchParams {
        MatchParams {
            threshold: self.threshold,
            location: self.location,
            distance: self.distance,
        }
    }

    /// Reject options that cannot produce a usable index
    pub fn validate(&self) -> Result<()> {
        if self.keys.is_empty() {
            return Err(SearchError::InvalidOptions("no search keys".into()));
        }
        if let Some(key) = self.keys.iter().find(|k| k.weight <= 0.0 || !k.weight.is_finite()) {
            return Err(SearchError::InvalidOptions(format!(
                "weight for {} must be positive, got {}",
                key.field, key.weight
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SearchError::InvalidOptions(format!(
                "threshold must be within 0..=1, got {}",
                self.threshold
            )));
        }
        if self.limit == 0 {
            return Err(SearchError::InvalidOptions("limit must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            keys: Self::DEFAULT_KEYS.to_vec(),
            threshold: 0.35,
            limit: 20,
            location: 0,
            distance: 100,
        }
    }
}

/// One query hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatch {
    /// The matched record
    pub record: PlayerRecord,

    /// Relevance; lower is better, 0 is perfect
    pub score: f64,

    /// Position of the record in the indexed list
    pub refs_index: usize,
}

impl PlayerMatch {
    /// Relevance on a 0..1 higher-is-better scale, for display
    pub fn relevance(&self) -> f64 {
        (1.0 - self.score).clamp(0.0, 1.0)
    }
}
