//! Curriculum catalog: the fixed chapter sequence and status vocabulary
//!
//! The Piper Alpha course is a fixed seven-chapter curriculum. The catalog is
//! compile-time data, not configuration: `Chapter::ALL` is the canonical
//! display order, and no value outside these enums is ever a valid chapter
//! name or status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven chapters of the training course, in canonical order
///
/// Variant order here IS the catalog order. Normalized records and rendered
/// reports list chapters in this order regardless of submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chapter {
    #[serde(rename = "Briefing Room")]
    BriefingRoom,
    #[serde(rename = "Arrival on Piper Alpha")]
    ArrivalOnPiperAlpha,
    #[serde(rename = "Maintenance Area")]
    MaintenanceArea,
    #[serde(rename = "Precursor to Disaster")]
    PrecursorToDisaster,
    #[serde(rename = "Explosion Simulation")]
    ExplosionSimulation,
    #[serde(rename = "Escape Aftermath")]
    EscapeAftermath,
    #[serde(rename = "Debrief")]
    Debrief,
}

impl Chapter {
    /// All chapters in catalog order
    pub const ALL: [Chapter; 7] = [
        Chapter::BriefingRoom,
        Chapter::ArrivalOnPiperAlpha,
        Chapter::MaintenanceArea,
        Chapter::PrecursorToDisaster,
        Chapter::ExplosionSimulation,
        Chapter::EscapeAftermath,
        Chapter::Debrief,
    ];

    /// Number of chapters in the curriculum
    pub const COUNT: usize = Chapter::ALL.len();

    /// Position of this chapter in catalog order (0-based)
    pub fn index(&self) -> usize {
        Chapter::ALL
            .iter()
            .position(|c| c == self)
            .expect("every chapter appears in ALL")
    }

    /// Display name of the chapter
    pub fn name(&self) -> &'static str {
        match self {
            Chapter::BriefingRoom => "Briefing Room",
            Chapter::ArrivalOnPiperAlpha => "Arrival on Piper Alpha",
            Chapter::MaintenanceArea => "Maintenance Area",
            Chapter::PrecursorToDisaster => "Precursor to Disaster",
            Chapter::ExplosionSimulation => "Explosion Simulation",
            Chapter::EscapeAftermath => "Escape Aftermath",
            Chapter::Debrief => "Debrief",
        }
    }

    /// Parse a chapter name (exact, case-sensitive match)
    pub fn parse(name: &str) -> Option<Chapter> {
        Chapter::ALL.iter().copied().find(|c| c.name() == name)
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Allowed status vocabulary for a chapter result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChapterStatus {
    Completed,
    Pending,
    #[serde(rename = "Not Completed")]
    NotCompleted,
}

impl ChapterStatus {
    /// All allowed statuses
    pub const ALL: [ChapterStatus; 3] = [
        ChapterStatus::Completed,
        ChapterStatus::Pending,
        ChapterStatus::NotCompleted,
    ];

    /// Display form of the status
    pub fn name(&self) -> &'static str {
        match self {
            ChapterStatus::Completed => "Completed",
            ChapterStatus::Pending => "Pending",
            ChapterStatus::NotCompleted => "Not Completed",
        }
    }

    /// Parse a status string (exact, case-sensitive match)
    pub fn parse(name: &str) -> Option<ChapterStatus> {
        ChapterStatus::ALL.iter().copied().find(|s| s.name() == name)
    }
}

impl fmt::Display for ChapterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
