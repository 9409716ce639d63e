//! Summary statistics over a normalized session record

use serde::Serialize;

use crate::record::SessionRecord;

/// Summary statistics derived on demand from a session record
///
/// `completed_count` counts chapters that carry a numeric score, whatever
/// their status label says; only unattempted placeholders are excluded.
/// `average_score` is undefined (None) when no chapter is scored — callers
/// must render a neutral phrase, never a zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedStats {
    pub completed_count: usize,
    pub average_score: Option<f64>,
}

impl DerivedStats {
    /// Average rounded to one decimal place for display, if defined
    pub fn average_display(&self) -> Option<String> {
        self.average_score.map(|avg| format!("{:.1}", avg))
    }
}

/// Derive summary statistics from a session record. Pure; no failure modes.
pub fn derive(record: &SessionRecord) -> DerivedStats {
    let scores: Vec<u8> = record.chapters.iter().filter_map(|c| c.score()).collect();

    let average_score = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64)
    };

    DerivedStats {
        completed_count: scores.len(),
        average_score,
    }
}
