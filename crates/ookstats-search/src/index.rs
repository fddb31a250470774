//! Search index snapshots

use std::cmp::Ordering;

use ookstats_core::PlayerRecord;
use tracing::debug;

use crate::error::Result;
use crate::fuzzy::{fold, FuzzyPattern, MatchParams};
use crate::query::{PlayerMatch, SearchOptions};

/// A folded field value and its length norm
#[derive(Debug, Clone)]
struct FieldEntry {
    chars: Vec<char>,
    norm: f64,
}

/// Point-in-time fuzzy index over a player list
///
/// A snapshot never changes after `build`; growing the player list means
/// building a new snapshot and swapping it in. Records keep their list order,
/// which is also the tiebreak between equal scores.
#[derive(Debug, Clone)]
pub struct SearchIndexSnapshot {
    records: Vec<PlayerRecord>,

    /// `entries[record][key]`, `None` when the record lacks the field
    entries: Vec<Vec<Option<FieldEntry>>>,

    /// Key weights normalized to sum to 1
    weights: Vec<f64>,

    options: SearchOptions,
    params: MatchParams,
}

impl SearchIndexSnapshot {
    /// Build a snapshot over `players`
    pub fn build(players: &[PlayerRecord], options: &SearchOptions) -> Result<Self> {
        options.validate()?;

        let total: f64 = options.keys.iter().map(|k| k.weight).sum();
        let weights = options.keys.iter().map(|k| k.weight / total).collect();

        let entries = players
            .iter()
            .map(|record| {
                options
                    .keys
                    .iter()
                    .map(|key| key.field.value(record).and_then(field_entry))
                    .collect()
            })
            .collect();

        debug!("Built search snapshot over {} players", players.len());

        Ok(Self {
            records: players.to_vec(),
            entries,
            weights,
            options: options.clone(),
            params: options.match_params(),
        })
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in index order
    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Up to `options.limit` matches for `query`, best first
    pub fn search(&self, query: &str) -> Vec<PlayerMatch> {
        self.search_with_limit(query, self.options.limit)
    }

    /// Up to `limit` matches for `query`, best first
    pub fn search_with_limit(&self, query: &str, limit: usize) -> Vec<PlayerMatch> {
        let Some(pattern) = FuzzyPattern::new(query) else {
            return Vec::new();
        };

        let mut scored: Vec<(usize, f64)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(idx, fields)| self.score_record(&pattern, fields).map(|s| (idx, s)))
            .collect();

        scored.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(idx, score)| PlayerMatch {
                record: self.records[idx].clone(),
                score,
                refs_index: idx,
            })
            .collect()
    }

    /// Product of `field_score ^ (weight * norm)` over matched fields
    fn score_record(&self, pattern: &FuzzyPattern, fields: &[Option<FieldEntry>]) -> Option<f64> {
        let mut total = 1.0;
        let mut matched = false;

        for (entry, weight) in fields.iter().zip(&self.weights) {
            let Some(entry) = entry else { continue };
            if let Some(score) = pattern.score(&entry.chars, &self.params) {
                total *= score.powf(weight * entry.norm);
                matched = true;
            }
        }

        matched.then_some(total)
    }
}

fn field_entry(value: &str) -> Option<FieldEntry> {
    let tokens = value.split_whitespace().count();
    if tokens == 0 {
        return None;
    }
    Some(FieldEntry {
        chars: fold(value),
        norm: field_norm(tokens),
    })
}

/// Longer fields weigh less: `1/sqrt(tokens)`, rounded to three places
fn field_norm(tokens: usize) -> f64 {
    let norm = 1.0 / (tokens as f64).sqrt();
    (norm * 1000.0).round() / 1000.0
}
