//! Training session queries
//!
//! Chapter results are stored as the canonical JSON array exactly as the
//! normalizer produced it; rows are immutable once inserted.

use sqlx::SqlitePool;
use uuid::Uuid;

use patt_common::record::{ChapterResult, SessionRecord};
use patt_common::{time, Error, Result};

use super::parse_timestamp;

type SessionRow = (String, String, String, String);

fn record_from_row(row: SessionRow) -> Result<SessionRecord> {
    let (guid, email, created_at, chapters) = row;
    let session_id = Uuid::parse_str(&guid)
        .map_err(|e| Error::Internal(format!("Invalid stored session id {:?}: {}", guid, e)))?;
    let chapters: Vec<ChapterResult> = serde_json::from_str(&chapters)
        .map_err(|e| Error::Internal(format!("Invalid stored chapter data: {}", e)))?;

    Ok(SessionRecord {
        session_id,
        owner_email: email,
        created_at: parse_timestamp(&created_at)?,
        chapters,
    })
}

/// Persist a normalized session, allocating its id and timestamp
///
/// The session id comes from the allocator here (random UUID), never from the
/// client; likewise `created_at` is the server clock at insert time.
pub async fn insert_session(
    pool: &SqlitePool,
    owner_email: &str,
    chapters: Vec<ChapterResult>,
) -> Result<SessionRecord> {
    let record = SessionRecord {
        session_id: Uuid::new_v4(),
        owner_email: owner_email.to_string(),
        created_at: time::now(),
        chapters,
    };

    let chapters_json = serde_json::to_string(&record.chapters)
        .map_err(|e| Error::Internal(format!("Failed to encode chapter data: {}", e)))?;

    sqlx::query(
        "INSERT INTO training_sessions (guid, email, created_at, chapters)
         VALUES (?, ?, ?, ?)",
    )
    .bind(record.session_id.to_string())
    .bind(&record.owner_email)
    .bind(record.created_at.to_rfc3339())
    .bind(chapters_json)
    .execute(pool)
    .await?;

    Ok(record)
}

/// Fetch one session by id
pub async fn get_session(pool: &SqlitePool, session_id: Uuid) -> Result<Option<SessionRecord>> {
    let row: Option<SessionRow> = sqlx::query_as(
        "SELECT guid, email, created_at, chapters
         FROM training_sessions WHERE guid = ?",
    )
    .bind(session_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(record_from_row).transpose()
}

/// All sessions for one account, newest first
pub async fn list_sessions_for(pool: &SqlitePool, email: &str) -> Result<Vec<SessionRecord>> {
    let rows: Vec<SessionRow> = sqlx::query_as(
        "SELECT guid, email, created_at, chapters
         FROM training_sessions WHERE email = ?
         ORDER BY created_at DESC",
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(record_from_row).collect()
}

/// Sessions across all accounts, newest first
pub async fn list_all_sessions(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<SessionRecord>> {
    let rows: Vec<SessionRow> = sqlx::query_as(
        "SELECT guid, email, created_at, chapters
         FROM training_sessions
         ORDER BY created_at DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(record_from_row).collect()
}
