//! Location-weighted approximate substring scoring.
//!
//! A pattern matches a field when some substring of the field is within a few
//! edits of the pattern. The score of an alignment starting at `start` is
//!
//! ```text
//! errors / pattern_len + |start - location| / distance
//! ```
//!
//! and the field score is the minimum over all alignments. Both terms are
//! folded into one Sellers-style DP: the first row carries the start penalty
//! scaled by the pattern length, so the last row holds
//! `errors + start_penalty * pattern_len` for every end position.
//!
//! Scores are in `[0, 1+]`; lower is better and a field only matches when its
//! score is at or below the threshold. A perfect hit is clamped to
//! [`MIN_SCORE`] so it still contributes to a weighted product.

/// Score assigned to a perfect match
pub const MIN_SCORE: f64 = 0.001;

/// Tuning for one field comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchParams {
    /// Highest score that still counts as a match
    pub threshold: f64,

    /// Expected start position of the match
    pub location: usize,

    /// How far from `location` a match may start before it costs a full error
    /// per pattern character; 0 pins matches to `location`
    pub distance: usize,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            threshold: 0.35,
            location: 0,
            distance: 100,
        }
    }
}

/// A lowercased query ready to be scored against many fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyPattern {
    chars: Vec<char>,
}

impl FuzzyPattern {
    /// Prepare `query`; blank queries produce no pattern
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            chars: fold(trimmed),
        })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Score the pattern against an already folded field
    pub fn score(&self, text: &[char], params: &MatchParams) -> Option<f64> {
        let m = self.chars.len();
        if m == 0 || text.is_empty() {
            return None;
        }
        let m_f = m as f64;
        let budget = params.threshold * m_f;

        // Row 0: cost of starting the alignment before text[j]
        let mut row: Vec<f64> = (0..=text.len())
            .map(|j| start_cost(j, params, m_f))
            .collect();
        let mut next = vec![0.0; row.len()];

        for (i, &pc) in self.chars.iter().enumerate() {
            next[0] = row[0] + 1.0;
            let mut row_min = next[0];

            for (j, &tc) in text.iter().enumerate() {
                let substitution = row[j] + if pc == tc { 0.0 } else { 1.0 };
                let skip_pattern = row[j + 1] + 1.0;
                let skip_text = next[j] + 1.0;
                let cell = substitution.min(skip_pattern).min(skip_text);
                next[j + 1] = cell;
                row_min = row_min.min(cell);
            }

            // Row minima never decrease, so the remaining rows cannot recover
            if row_min > budget && i + 1 < m {
                return None;
            }
            std::mem::swap(&mut row, &mut next);
        }

        let best = row.iter().copied().fold(f64::INFINITY, f64::min) / m_f;
        if best > params.threshold {
            None
        } else if best <= 0.0 {
            Some(MIN_SCORE)
        } else {
            Some(best)
        }
    }
}

/// Lowercase a field for matching
pub fn fold(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

fn start_cost(start: usize, params: &MatchParams, pattern_len: f64) -> f64 {
    let offset = start.abs_diff(params.location);
    if params.distance == 0 {
        if offset == 0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        offset as f64 * pattern_len / params.distance as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(pattern: &str, text: &str) -> Option<f64> {
        FuzzyPattern::new(pattern)
            .unwrap()
            .score(&fold(text), &MatchParams::default())
    }

    #[test]
    fn test_exact_prefix_is_perfect() {
        assert_eq!(score("thral", "Thrall"), Some(MIN_SCORE));
        assert_eq!(score("THRALL", "thrall"), Some(MIN_SCORE));
    }

    #[test]
    fn test_single_typo_matches() {
        let s = score("thrail", "Thrall").unwrap();
        assert!((s - 1.0 / 6.0).abs() < 1e-9, "got {}", s);
    }

    #[test]
    fn test_unrelated_text_does_not_match() {
        assert_eq!(score("thral", "Jaina"), None);
        assert_eq!(score("thral", "og"), None);
    }

    #[test]
    fn test_later_start_costs_more() {
        let early = score("ana", "anaxyz").unwrap();
        let late = score("ana", "xyzana").unwrap();
        assert!(early < late);
        assert!((late - 0.03).abs() < 1e-9, "got {}", late);
    }

    #[test]
    fn test_far_substring_exceeds_threshold() {
        let text = format!("{}thrall", "x".repeat(40));
        assert_eq!(score("thrall", &text), None);
    }

    #[test]
    fn test_zero_distance_pins_location() {
        let params = MatchParams {
            distance: 0,
            ..MatchParams::default()
        };
        let pattern = FuzzyPattern::new("ana").unwrap();
        assert!(pattern.score(&fold("ana"), &params).is_some());
        assert!(pattern.score(&fold("xxana"), &params).is_none());
    }

    #[test]
    fn test_blank_query_has_no_pattern() {
        assert!(FuzzyPattern::new("").is_none());
        assert!(FuzzyPattern::new("   ").is_none());
    }

    #[test]
    fn test_unicode_folding() {
        assert_eq!(score("ÉLUNE", "élune"), Some(MIN_SCORE));
    }
}
