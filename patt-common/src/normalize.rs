//! Submission normalizer
//!
//! Validates an untrusted, partial chapter submission against the curriculum
//! catalog and completes it into the canonical seven-chapter layout. Chapters
//! missing from the submission become `Unattempted` placeholders; output is
//! always in catalog order, so two submissions carrying the same entries in
//! different orders normalize identically.
//!
//! Validation fails fast on the first violation. Every failure kind is a
//! distinct variant so callers can map them to distinct responses.

use serde::Deserialize;
use thiserror::Error;

use crate::curriculum::{Chapter, ChapterStatus};
use crate::record::{ChapterResult, MAX_SCORE, MIN_SCORE};

/// One entry of an untrusted submission, exactly as received on the wire
#[derive(Debug, Clone, Deserialize)]
pub struct RawChapter {
    pub chapter: String,
    pub score: RawScore,
    pub status: String,
}

/// Raw score field: clients may send any JSON scalar here
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawScore {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

/// Rejection reasons for a submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Chapter name does not exactly match any catalog chapter
    #[error("invalid chapter name: {0:?}")]
    InvalidChapterName(String),

    /// Score is not an integer in range, or is the reserved "NA" sentinel
    #[error("invalid score for {chapter}: {value}")]
    InvalidScore { chapter: String, value: String },

    /// Status string is not part of the allowed vocabulary
    #[error("invalid status for {chapter}: {value:?}")]
    InvalidStatus { chapter: String, value: String },

    /// The same chapter appears more than once in one submission
    #[error("duplicate chapter in submission: {0}")]
    DuplicateChapter(Chapter),

    /// Owner email does not resolve to a stored account
    #[error("no account found for owner: {0}")]
    UnknownOwner(String),
}

/// Validate a raw submission and complete it to the canonical chapter layout
///
/// Accepts 0 to 7 entries. Each entry must name a catalog chapter exactly,
/// carry an integer score in [0, 10], and one of the three allowed statuses.
/// Submitting "NA" explicitly is rejected: the sentinel belongs to the
/// completion step alone. Duplicate chapters are rejected rather than
/// last-write-wins resolved.
pub fn normalize_chapters(raw: &[RawChapter]) -> Result<Vec<ChapterResult>, NormalizeError> {
    let mut validated: [Option<ChapterResult>; Chapter::COUNT] = Default::default();

    for entry in raw {
        let chapter = Chapter::parse(&entry.chapter)
            .ok_or_else(|| NormalizeError::InvalidChapterName(entry.chapter.clone()))?;

        let score = validate_score(chapter, &entry.score)?;

        let status = ChapterStatus::parse(&entry.status).ok_or_else(|| {
            NormalizeError::InvalidStatus {
                chapter: chapter.name().to_string(),
                value: entry.status.clone(),
            }
        })?;

        let slot = &mut validated[chapter.index()];
        if slot.is_some() {
            return Err(NormalizeError::DuplicateChapter(chapter));
        }
        *slot = Some(ChapterResult::Scored { chapter, score, status });
    }

    // Completion: every catalog chapter absent from the submission becomes an
    // Unattempted placeholder. Output order is catalog order.
    Ok(Chapter::ALL
        .iter()
        .enumerate()
        .map(|(i, &chapter)| {
            validated[i]
                .take()
                .unwrap_or(ChapterResult::Unattempted { chapter })
        })
        .collect())
}

fn validate_score(chapter: Chapter, raw: &RawScore) -> Result<u8, NormalizeError> {
    let reject = |value: String| NormalizeError::InvalidScore {
        chapter: chapter.name().to_string(),
        value,
    };

    match raw {
        RawScore::Integer(n) if (MIN_SCORE as i64..=MAX_SCORE as i64).contains(n) => Ok(*n as u8),
        RawScore::Integer(n) => Err(reject(n.to_string())),
        RawScore::Decimal(x) => Err(reject(x.to_string())),
        // "NA" is reserved for auto-completion; no string is a valid score
        RawScore::Text(s) => Err(reject(format!("{:?}", s))),
    }
}
