//! Path builders for static resources and site navigation

use crate::Region;

/// Profile page path for a player; the name is lowercased
pub fn player_profile_path(region: Region, realm_slug: &str, name: &str) -> String {
    format!("/player/{}/{}/{}", region, realm_slug, name.to_lowercase())
}

/// Path of a search index shard, zero-padded to three digits
pub fn search_shard_path(shard: u32) -> String {
    format!("/api/search/players-{:03}.json", shard)
}
