//! Results panel view model

use ookstats_core::class_color;
use serde::Serialize;

use crate::controller::{QueryState, SearchPhase, SelectionSource};

/// Scores above this are flagged as approximate matches
pub const FUZZY_MARKER_SCORE: f64 = 0.1;

/// What the results panel should show
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultsView {
    pub visible: bool,
    pub loading: bool,
    pub no_results: bool,
    pub rows: Vec<ResultRow>,

    /// Row to bring into view; keyboard selection only
    pub scroll_to: Option<usize>,
}

/// One rendered match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub name: String,
    pub region_badge: String,
    pub realm_name: String,

    /// Class color, `None` when the class is unknown
    pub color: Option<&'static str>,

    pub href: String,
    pub selected: bool,
    pub fuzzy_marker: bool,

    /// `1 - score`, for the marker's tooltip
    pub relevance: f64,
}

/// Render the panel for `state`
pub fn render(state: &QueryState) -> ResultsView {
    let phase = state.phase;
    let selected = usize::try_from(state.selected).ok();

    let rows: Vec<ResultRow> = if phase == SearchPhase::Showing {
        state
            .matches
            .iter()
            .enumerate()
            .map(|(idx, m)| ResultRow {
                name: m.record.name.clone(),
                region_badge: m.record.region.badge().to_string(),
                realm_name: m.record.realm_name.clone(),
                color: m.record.class_name.as_deref().map(class_color),
                href: m.record.profile_path(),
                selected: selected == Some(idx),
                fuzzy_marker: m.score > FUZZY_MARKER_SCORE,
                relevance: m.relevance(),
            })
            .collect()
    } else {
        Vec::new()
    };

    let scroll_to = match state.selection_source {
        SelectionSource::Keyboard => selected.filter(|idx| *idx < rows.len()),
        SelectionSource::Pointer => None,
    };

    ResultsView {
        visible: phase != SearchPhase::Idle,
        loading: phase == SearchPhase::Loading,
        no_results: phase == SearchPhase::NoResults,
        rows,
        scroll_to,
    }
}

impl ResultsView {
    /// Terminal rendering, one line per row
    pub fn to_text(&self) -> String {
        if !self.visible {
            return String::new();
        }
        if self.loading {
            return "Loading players...".to_string();
        }
        if self.no_results {
            return "No players found".to_string();
        }

        self.rows
            .iter()
            .map(|row| {
                let cursor = if row.selected { ">" } else { " " };
                let marker = if row.fuzzy_marker {
                    format!("~({:.2}) ", row.relevance)
                } else {
                    String::new()
                };
                format!(
                    "{} {}{} [{}] {}  {}",
                    cursor, marker, row.name, row.region_badge, row.realm_name, row.href
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
