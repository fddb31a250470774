//! Player-name autocomplete for the chat bot
//!
//! Unlike the fuzzy index this is a plain filter: every filter is an exact,
//! case-insensitive comparison and the query must appear inside the name.

use ookstats_core::{class_key, PlayerRecord, Region};
use serde::{Deserialize, Serialize};

/// Most choices a chat platform accepts in one autocomplete response
pub const MAX_AUTOCOMPLETE_CHOICES: usize = 25;

/// Autocomplete input as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteRequest {
    pub query: String,
    pub region: Option<Region>,
    pub realm_slug: Option<String>,
    pub class_name: Option<String>,
}

impl AutocompleteRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_realm(mut self, realm_slug: impl Into<String>) -> Self {
        self.realm_slug = Some(realm_slug.into());
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    fn is_unfiltered(&self) -> bool {
        self.region.is_none() && self.realm_slug.is_none() && self.class_name.is_none()
    }
}

/// One autocomplete option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteChoice {
    pub name: String,
    pub value: String,
}

impl From<&PlayerRecord> for AutocompleteChoice {
    fn from(record: &PlayerRecord) -> Self {
        Self {
            name: record.name.clone(),
            value: record.name.clone(),
        }
    }
}

/// Choices for `request` drawn from `players`
///
/// With nothing typed and no filters the list order is kept (the generator
/// already writes players best-ranked first). Otherwise matches are ordered
/// by global ranking with unranked players last.
pub fn autocomplete_players(
    players: &[PlayerRecord],
    request: &AutocompleteRequest,
) -> Vec<AutocompleteChoice> {
    let query = request.query.trim().to_lowercase();

    if query.is_empty() && request.is_unfiltered() {
        return players
            .iter()
            .take(MAX_AUTOCOMPLETE_CHOICES)
            .map(AutocompleteChoice::from)
            .collect();
    }

    let realm = request.realm_slug.as_deref().map(str::to_lowercase);
    let class = request.class_name.as_deref().map(class_key);

    let mut matches: Vec<&PlayerRecord> = players
        .iter()
        .filter(|p| request.region.map_or(true, |r| p.region == r))
        .filter(|p| realm.as_deref().map_or(true, |r| p.realm_slug.to_lowercase() == r))
        .filter(|p| {
            class.as_deref().map_or(true, |c| {
                p.class_name.as_deref().map(class_key).as_deref() == Some(c)
            })
        })
        .filter(|p| query.is_empty() || p.name.to_lowercase().contains(&query))
        .collect();

    // Stable sort keeps list order among equal rankings
    matches.sort_by_key(|p| (p.global_ranking.is_none(), p.global_ranking));
    matches
        .into_iter()
        .take(MAX_AUTOCOMPLETE_CHOICES)
        .map(AutocompleteChoice::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<PlayerRecord> {
        vec![
            PlayerRecord::new(1, "Thrall", "og", "Og", Region::Us)
                .with_class("Shaman", None)
                .with_ranking(5),
            PlayerRecord::new(2, "Thrallbro", "og", "Og", Region::Eu)
                .with_class("Death Knight", None)
                .with_ranking(2),
            PlayerRecord::new(3, "Thrallina", "stormrage", "Stormrage", Region::Us),
            PlayerRecord::new(4, "Jaina", "og", "Og", Region::Us).with_ranking(1),
        ]
    }

    fn names(choices: &[AutocompleteChoice]) -> Vec<&str> {
        choices.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_blank_request_keeps_list_order() {
        let choices = autocomplete_players(&roster(), &AutocompleteRequest::default());
        assert_eq!(names(&choices), ["Thrall", "Thrallbro", "Thrallina", "Jaina"]);
    }

    #[test]
    fn test_substring_sorted_by_ranking() {
        let choices = autocomplete_players(&roster(), &AutocompleteRequest::new("THRALL"));
        assert_eq!(names(&choices), ["Thrallbro", "Thrall", "Thrallina"]);
    }

    #[test]
    fn test_filters_combine() {
        let request = AutocompleteRequest::new("thrall")
            .with_region(Region::Us)
            .with_realm("OG");
        assert_eq!(names(&autocomplete_players(&roster(), &request)), ["Thrall"]);

        let request = AutocompleteRequest::default().with_class("death knight");
        assert_eq!(names(&autocomplete_players(&roster(), &request)), ["Thrallbro"]);
    }

    #[test]
    fn test_caps_choice_count() {
        let players: Vec<_> = (0..40)
            .map(|i| PlayerRecord::new(i, format!("Anduin{}", i), "og", "Og", Region::Us))
            .collect();
        let choices = autocomplete_players(&players, &AutocompleteRequest::new("anduin"));
        assert_eq!(choices.len(), MAX_AUTOCOMPLETE_CHOICES);
        assert_eq!(choices[0].value, "Anduin0");
    }
}
