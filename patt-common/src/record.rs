//! Session record model
//!
//! A `SessionRecord` is the canonical result of one training session: exactly
//! one `ChapterResult` per catalog chapter, in catalog order. Records are
//! created once by the normalizer and never mutated; a resubmission creates a
//! new record.
//!
//! On the wire and in storage each chapter row is
//! `{"chapter": <name>, "score": <integer or "NA">, "status": <status>}` —
//! the `"NA"` sentinel is reserved for unattempted chapters and only ever
//! written by the completion step, never accepted from a client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::curriculum::{Chapter, ChapterStatus};

/// Lowest valid chapter score
pub const MIN_SCORE: u8 = 0;
/// Highest valid chapter score
pub const MAX_SCORE: u8 = 10;

/// Result for one chapter of a session
///
/// Scored and unattempted chapters are distinct variants so that "excluded
/// from the average" is a property of the type, not a sentinel check at every
/// call site. An unattempted chapter always renders score "NA" and status
/// "Not Completed".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChapterEntry", into = "ChapterEntry")]
pub enum ChapterResult {
    Scored {
        chapter: Chapter,
        score: u8,
        status: ChapterStatus,
    },
    Unattempted {
        chapter: Chapter,
    },
}

impl ChapterResult {
    pub fn chapter(&self) -> Chapter {
        match self {
            ChapterResult::Scored { chapter, .. } => *chapter,
            ChapterResult::Unattempted { chapter } => *chapter,
        }
    }

    /// Numeric score, if the chapter was attempted
    pub fn score(&self) -> Option<u8> {
        match self {
            ChapterResult::Scored { score, .. } => Some(*score),
            ChapterResult::Unattempted { .. } => None,
        }
    }

    /// Score as displayed: the number, or "NA" for unattempted chapters
    pub fn score_label(&self) -> String {
        match self {
            ChapterResult::Scored { score, .. } => score.to_string(),
            ChapterResult::Unattempted { .. } => "NA".to_string(),
        }
    }

    pub fn status(&self) -> ChapterStatus {
        match self {
            ChapterResult::Scored { status, .. } => *status,
            ChapterResult::Unattempted { .. } => ChapterStatus::NotCompleted,
        }
    }
}

/// Wire/storage form of one chapter row
///
/// Bridges `ChapterResult` to the stored JSON shape. Only trusted data (a
/// normalized record read back from storage) flows through `TryFrom` —
/// untrusted submissions go through the normalizer instead, which rejects
/// explicit "NA" scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterEntry {
    chapter: Chapter,
    score: ScoreField,
    status: ChapterStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ScoreField {
    Number(u8),
    Text(String),
}

impl From<ChapterResult> for ChapterEntry {
    fn from(result: ChapterResult) -> ChapterEntry {
        let chapter = result.chapter();
        let status = result.status();
        let score = match result.score() {
            Some(n) => ScoreField::Number(n),
            None => ScoreField::Text("NA".to_string()),
        };
        ChapterEntry { chapter, score, status }
    }
}

impl TryFrom<ChapterEntry> for ChapterResult {
    type Error = String;

    fn try_from(entry: ChapterEntry) -> Result<ChapterResult, String> {
        match entry.score {
            ScoreField::Number(score) => {
                if score > MAX_SCORE {
                    return Err(format!("score {} out of range", score));
                }
                Ok(ChapterResult::Scored {
                    chapter: entry.chapter,
                    score,
                    status: entry.status,
                })
            }
            ScoreField::Text(text) if text == "NA" => Ok(ChapterResult::Unattempted {
                chapter: entry.chapter,
            }),
            ScoreField::Text(text) => Err(format!("invalid stored score {:?}", text)),
        }
    }
}

/// Canonical record of one training session
///
/// `session_id` and `created_at` are assigned server-side at creation time;
/// neither is ever client-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub owner_email: String,
    pub created_at: DateTime<Utc>,
    pub chapters: Vec<ChapterResult>,
}

impl SessionRecord {
    /// Check the canonical-layout invariant: exactly one result per catalog
    /// chapter, in catalog order
    pub fn is_canonical(&self) -> bool {
        self.chapters.len() == Chapter::COUNT
            && self
                .chapters
                .iter()
                .zip(Chapter::ALL.iter())
                .all(|(result, chapter)| result.chapter() == *chapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_chapters() -> Vec<ChapterResult> {
        Chapter::ALL
            .iter()
            .map(|&chapter| ChapterResult::Unattempted { chapter })
            .collect()
    }

    fn record_with(chapters: Vec<ChapterResult>) -> SessionRecord {
        SessionRecord {
            session_id: Uuid::nil(),
            owner_email: "r@x.com".to_string(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            chapters,
        }
    }

    #[test]
    fn test_unattempted_renders_na_and_not_completed() {
        let result = ChapterResult::Unattempted {
            chapter: Chapter::Debrief,
        };
        assert_eq!(result.score(), None);
        assert_eq!(result.score_label(), "NA");
        assert_eq!(result.status(), ChapterStatus::NotCompleted);
    }

    #[test]
    fn test_chapter_result_wire_shape() {
        let scored = ChapterResult::Scored {
            chapter: Chapter::BriefingRoom,
            score: 8,
            status: ChapterStatus::Completed,
        };
        let json = serde_json::to_string(&scored).unwrap();
        assert_eq!(
            json,
            r#"{"chapter":"Briefing Room","score":8,"status":"Completed"}"#
        );

        let unattempted = ChapterResult::Unattempted {
            chapter: Chapter::Debrief,
        };
        let json = serde_json::to_string(&unattempted).unwrap();
        assert_eq!(
            json,
            r#"{"chapter":"Debrief","score":"NA","status":"Not Completed"}"#
        );
    }

    #[test]
    fn test_chapter_result_round_trip_from_storage() {
        let original = vec![
            ChapterResult::Scored {
                chapter: Chapter::BriefingRoom,
                score: 10,
                status: ChapterStatus::Pending,
            },
            ChapterResult::Unattempted {
                chapter: Chapter::MaintenanceArea,
            },
        ];
        let json = serde_json::to_string(&original).unwrap();
        let back: Vec<ChapterResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_stored_score_other_than_na_rejected() {
        let json = r#"{"chapter":"Debrief","score":"N/A","status":"Not Completed"}"#;
        assert!(serde_json::from_str::<ChapterResult>(json).is_err());
    }

    #[test]
    fn test_is_canonical_accepts_catalog_order() {
        assert!(record_with(canonical_chapters()).is_canonical());
    }

    #[test]
    fn test_is_canonical_rejects_wrong_length() {
        let mut chapters = canonical_chapters();
        chapters.pop();
        assert!(!record_with(chapters).is_canonical());
    }

    #[test]
    fn test_is_canonical_rejects_wrong_order() {
        let mut chapters = canonical_chapters();
        chapters.swap(0, 1);
        assert!(!record_with(chapters).is_canonical());
    }
}
