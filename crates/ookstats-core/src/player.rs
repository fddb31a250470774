//! Player types - the searchable identity of one player

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Battle.net region a player's realm belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Eu,
    Kr,
    Tw,
}

impl Region {
    /// All known regions, in display order
    pub const ALL: [Region; 4] = [Region::Us, Region::Eu, Region::Kr, Region::Tw];

    /// Lowercase region code as used in paths and shard files
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Eu => "eu",
            Region::Kr => "kr",
            Region::Tw => "tw",
        }
    }

    /// Uppercase badge text shown next to a search result
    pub fn badge(&self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Eu => "EU",
            Region::Kr => "KR",
            Region::Tw => "TW",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Region::Us),
            "eu" => Ok(Region::Eu),
            "kr" => Ok(Region::Kr),
            "tw" => Ok(Region::Tw),
            other => Err(CoreError::InvalidRegion(other.to_string())),
        }
    }
}

/// Immutable snapshot of one player's searchable identity
///
/// Records are appended shard by shard and never diffed, so the same `id`
/// can legitimately appear more than once in a merged list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Unique within a season/region combination
    pub id: i64,

    /// In-game name, case preserved
    pub name: String,

    /// Realm slug used in profile paths
    pub realm_slug: String,

    /// Human readable realm name
    pub realm_name: String,

    /// Region of the realm
    #[serde(default)]
    pub region: Region,

    /// Class name, used only to tint a result row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Active specialization name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_spec_name: Option<String>,

    /// Global rank, lower is better
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_ranking: Option<i64>,
}

impl PlayerRecord {
    /// Create a record with only the required identity fields
    pub fn new(
        id: i64,
        name: impl Into<String>,
        realm_slug: impl Into<String>,
        realm_name: impl Into<String>,
        region: Region,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            realm_slug: realm_slug.into(),
            realm_name: realm_name.into(),
            region,
            class_name: None,
            active_spec_name: None,
            global_ranking: None,
        }
    }

    /// Set the class and active spec
    pub fn with_class(mut self, class_name: impl Into<String>, spec: Option<&str>) -> Self {
        self.class_name = Some(class_name.into());
        self.active_spec_name = spec.map(str::to_string);
        self
    }

    /// Set the global ranking
    pub fn with_ranking(mut self, ranking: i64) -> Self {
        self.global_ranking = Some(ranking);
        self
    }

    /// Profile path for this player
    pub fn profile_path(&self) -> String {
        crate::paths::player_profile_path(self.region, &self.realm_slug, &self.name)
    }
}
