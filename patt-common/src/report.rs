//! Course progress report synthesis
//!
//! Lays out a single-page A4 PDF from a normalized session record and its
//! derived statistics: header with reserved logo space, trainee identity
//! block, the seven-chapter results table, and an auto-generated remarks
//! sentence.
//!
//! Rendering is deterministic: identical inputs produce byte-identical
//! output. No creation timestamps or random identifiers are embedded, and
//! month names come from chrono's fixed English formatter.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Cursor;
use thiserror::Error;

use crate::curriculum::Chapter;
use crate::record::SessionRecord;
use crate::stats::DerivedStats;

/// Report synthesis failures
///
/// `InternalConsistency` signals a defect upstream (a record that escaped
/// normalization), never a user input error.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("session record violates the canonical chapter layout: {0}")]
    InternalConsistency(String),

    #[error("failed to encode report document: {0}")]
    Encode(String),
}

// A4 geometry in PDF points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;

// Table column x positions and extent
const COL_CHAPTER_X: i64 = MARGIN;
const COL_SCORE_X: i64 = 330;
const COL_STATUS_X: i64 = 420;
const TABLE_RIGHT_X: i64 = PAGE_WIDTH - MARGIN;
const ROW_HEIGHT: i64 = 24;

/// Fixed report title
pub const REPORT_TITLE: &str = "COURSE PROGRESS REPORT";
/// Fixed report subtitle
pub const REPORT_SUBTITLE: &str = "PIPER ALPHA";

/// Build the remarks sentence for a session
///
/// When no chapter is scored the average clause is omitted entirely — the
/// sentence never shows a placeholder or zero average.
pub fn remarks_sentence(stats: &DerivedStats) -> String {
    match stats.average_display() {
        Some(avg) => format!(
            "Trainee has completed {} out of {} chapters with an average score of {}.",
            stats.completed_count,
            Chapter::COUNT,
            avg
        ),
        None => format!(
            "Trainee has completed {} out of {} chapters.",
            stats.completed_count,
            Chapter::COUNT
        ),
    }
}

/// Render the course progress report as PDF bytes
///
/// Fails only when the record violates the seven-chapter canonical-order
/// invariant, or if document encoding itself fails.
pub fn render_course_report(
    trainee_name: &str,
    record: &SessionRecord,
    stats: &DerivedStats,
) -> Result<Vec<u8>, ReportError> {
    if !record.is_canonical() {
        return Err(ReportError::InternalConsistency(format!(
            "expected {} chapters in catalog order, found {}",
            Chapter::COUNT,
            record.chapters.len()
        )));
    }

    let mut ops: Vec<Operation> = Vec::new();

    // ----- Header: reserved logo region, title, subtitle -----

    // Logo placeholder: layout space only, no image content
    set_stroke_gray(&mut ops, 0.75);
    set_line_width(&mut ops, 1.0);
    stroke_rect(&mut ops, (PAGE_WIDTH - 100) / 2, 755, 100, 45);

    show_text(
        &mut ops,
        "F2",
        20,
        centered_x(REPORT_TITLE, 20),
        715,
        REPORT_TITLE,
    );
    show_text(
        &mut ops,
        "F2",
        16,
        centered_x(REPORT_SUBTITLE, 16),
        688,
        REPORT_SUBTITLE,
    );

    // ----- Trainee details -----

    show_text(&mut ops, "F2", 12, MARGIN, 640, "TRAINEE DETAILS");

    let session_date = record.created_at.format("%B %d, %Y").to_string();
    let details: [(&str, String); 4] = [
        ("Name:", trainee_name.to_string()),
        ("Email:", record.owner_email.clone()),
        ("Date:", session_date),
        ("Session ID:", record.session_id.to_string()),
    ];
    for (i, (label, value)) in details.iter().enumerate() {
        let y = 618 - 16 * i as i64;
        show_text(&mut ops, "F2", 10, MARGIN, y, label);
        show_text(&mut ops, "F1", 10, MARGIN + 70, y, value);
    }

    // ----- Chapter results table -----

    let header_y = 520;
    show_text(&mut ops, "F2", 11, COL_CHAPTER_X, header_y, "Chapter");
    show_text(&mut ops, "F2", 11, COL_SCORE_X, header_y, "Score");
    show_text(&mut ops, "F2", 11, COL_STATUS_X, header_y, "Status");

    set_stroke_gray(&mut ops, 0.0);
    set_line_width(&mut ops, 1.5);
    hline(&mut ops, COL_CHAPTER_X, header_y - 8, TABLE_RIGHT_X);

    let first_row_y = header_y - 32;
    for (i, result) in record.chapters.iter().enumerate() {
        let y = first_row_y - ROW_HEIGHT * i as i64;

        // Alternating row fill: readability only, no meaning
        if i % 2 == 1 {
            set_fill_gray(&mut ops, 0.94);
            fill_rect(&mut ops, COL_CHAPTER_X, y - 7, TABLE_RIGHT_X - COL_CHAPTER_X, 22);
        }
        set_fill_gray(&mut ops, 0.0);

        show_text(&mut ops, "F1", 10, COL_CHAPTER_X, y, result.chapter().name());
        show_text(&mut ops, "F1", 10, COL_SCORE_X, y, &result.score_label());
        show_text(&mut ops, "F1", 10, COL_STATUS_X, y, result.status().name());

        if i + 1 < record.chapters.len() {
            set_stroke_gray(&mut ops, 0.8);
            set_line_width(&mut ops, 0.5);
            hline(&mut ops, COL_CHAPTER_X, y - 8, TABLE_RIGHT_X);
        }
    }

    let table_bottom_y = first_row_y - ROW_HEIGHT * (Chapter::COUNT as i64 - 1) - 8;
    set_stroke_gray(&mut ops, 0.0);
    set_line_width(&mut ops, 1.0);
    hline(&mut ops, COL_CHAPTER_X, table_bottom_y, TABLE_RIGHT_X);

    // ----- Remarks -----

    set_fill_gray(&mut ops, 0.0);
    show_text(&mut ops, "F2", 12, MARGIN, 300, "REMARKS");
    show_text(&mut ops, "F1", 10, MARGIN, 278, &remarks_sentence(stats));

    encode_single_page(ops)
}

/// Assemble one A4 page around the given content operations
fn encode_single_page(ops: Vec<Operation>) -> Result<Vec<u8>, ReportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_regular,
            "F2" => font_bold,
        },
    });

    let content = Content { operations: ops };
    let encoded = content
        .encode()
        .map_err(|e| ReportError::Encode(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Cursor::new(Vec::new());
    doc.save_to(&mut buffer)
        .map_err(|e| ReportError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

// ----- Content stream helpers -----

fn show_text(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    ops.push(Operation::new("ET", vec![]));
}

fn set_fill_gray(ops: &mut Vec<Operation>, level: f32) {
    ops.push(Operation::new("g", vec![Object::Real(level.into())]));
}

fn set_stroke_gray(ops: &mut Vec<Operation>, level: f32) {
    ops.push(Operation::new("G", vec![Object::Real(level.into())]));
}

fn set_line_width(ops: &mut Vec<Operation>, width: f32) {
    ops.push(Operation::new("w", vec![Object::Real(width.into())]));
}

fn fill_rect(ops: &mut Vec<Operation>, x: i64, y: i64, w: i64, h: i64) {
    ops.push(Operation::new(
        "re",
        vec![x.into(), y.into(), w.into(), h.into()],
    ));
    ops.push(Operation::new("f", vec![]));
}

fn stroke_rect(ops: &mut Vec<Operation>, x: i64, y: i64, w: i64, h: i64) {
    ops.push(Operation::new(
        "re",
        vec![x.into(), y.into(), w.into(), h.into()],
    ));
    ops.push(Operation::new("S", vec![]));
}

fn hline(ops: &mut Vec<Operation>, x1: i64, y: i64, x2: i64) {
    ops.push(Operation::new("m", vec![x1.into(), y.into()]));
    ops.push(Operation::new("l", vec![x2.into(), y.into()]));
    ops.push(Operation::new("S", vec![]));
}

/// Approximate centering for the fixed header strings. Helvetica metrics are
/// not embedded; 0.6em average glyph width is close enough for layout and
/// keeps the computation integer-exact.
fn centered_x(text: &str, size: i64) -> i64 {
    let width = text.len() as i64 * size * 3 / 5;
    ((PAGE_WIDTH - width) / 2).max(MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::ChapterStatus;
    use crate::record::ChapterResult;
    use crate::stats::derive;
    use chrono::DateTime;
    use uuid::Uuid;

    fn sample_record(scores: &[u8]) -> SessionRecord {
        let chapters = Chapter::ALL
            .iter()
            .enumerate()
            .map(|(i, &chapter)| match scores.get(i) {
                Some(&score) => ChapterResult::Scored {
                    chapter,
                    score,
                    status: ChapterStatus::Completed,
                },
                None => ChapterResult::Unattempted { chapter },
            })
            .collect();

        SessionRecord {
            session_id: Uuid::nil(),
            owner_email: "r@x.com".to_string(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            chapters,
        }
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|w| w == needle.as_bytes())
    }

    #[test]
    fn test_remarks_sentence_with_average() {
        let record = sample_record(&[8, 6]);
        let sentence = remarks_sentence(&derive(&record));
        assert_eq!(
            sentence,
            "Trainee has completed 2 out of 7 chapters with an average score of 7.0."
        );
    }

    #[test]
    fn test_remarks_sentence_omits_average_when_undefined() {
        let record = sample_record(&[]);
        let sentence = remarks_sentence(&derive(&record));
        assert_eq!(sentence, "Trainee has completed 0 out of 7 chapters.");
        assert!(!sentence.contains("average"));
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let record = sample_record(&[8, 6]);
        let stats = derive(&record);
        let bytes = render_course_report("Red Adair", &record, &stats).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        // Content streams are uncompressed, so layout text is visible
        assert!(contains(&bytes, REPORT_TITLE));
        assert!(contains(&bytes, REPORT_SUBTITLE));
        assert!(contains(&bytes, "Red Adair"));
        assert!(contains(&bytes, "r@x.com"));
        assert!(contains(&bytes, "November 14, 2023"));
    }

    #[test]
    fn test_render_lists_all_chapters_in_order() {
        let record = sample_record(&[8, 6]);
        let stats = derive(&record);
        let bytes = render_course_report("Red Adair", &record, &stats).unwrap();

        let mut last = 0;
        for chapter in Chapter::ALL {
            let pos = bytes
                .windows(chapter.name().len())
                .position(|w| w == chapter.name().as_bytes())
                .unwrap_or_else(|| panic!("chapter {} missing from report", chapter));
            assert!(pos > last, "chapter {} out of order", chapter);
            last = pos;
        }
        // Unattempted chapters show the NA sentinel
        assert!(contains(&bytes, "(NA)"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let record = sample_record(&[8, 6, 10]);
        let stats = derive(&record);
        let first = render_course_report("Red Adair", &record, &stats).unwrap();
        let second = render_course_report("Red Adair", &record, &stats).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_zero_completion_remarks() {
        let record = sample_record(&[]);
        let stats = derive(&record);
        let bytes = render_course_report("Red Adair", &record, &stats).unwrap();

        assert!(contains(&bytes, "completed 0 out of 7 chapters."));
        assert!(!contains(&bytes, "average score"));
    }

    #[test]
    fn test_render_rejects_short_record() {
        let mut record = sample_record(&[8]);
        record.chapters.pop();
        let stats = derive(&record);
        let err = render_course_report("Red Adair", &record, &stats).unwrap_err();
        assert!(matches!(err, ReportError::InternalConsistency(_)));
    }

    #[test]
    fn test_render_rejects_reordered_record() {
        let mut record = sample_record(&[8]);
        record.chapters.swap(0, 6);
        let stats = derive(&record);
        let err = render_course_report("Red Adair", &record, &stats).unwrap_err();
        assert!(matches!(err, ReportError::InternalConsistency(_)));
    }
}
