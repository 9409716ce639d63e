//! Performance submission and session listing endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use patt_common::db::Role;
use patt_common::normalize::{normalize_chapters, NormalizeError, RawChapter};
use patt_common::record::SessionRecord;
use patt_common::stats::{derive, DerivedStats};

use crate::api::CurrentUser;
use crate::{db, AppState};

/// Submission body posted by the simulator
///
/// 0 to 7 chapter entries; any chapter left out is recorded as unattempted.
/// No timestamp field exists on the wire — session time is assigned here.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub email: String,
    pub chapters: Vec<RawChapter>,
}

/// Successful submission response
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// POST /performance
///
/// Submit performance data for a training session (called by the simulator,
/// no authentication). Chapter shape is validated before the owner lookup so
/// malformed payloads never touch the store; nothing is persisted unless the
/// whole submission is valid.
pub async fn submit_performance(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), SubmitError> {
    let chapters = normalize_chapters(&request.chapters).map_err(|e| {
        warn!("Rejected submission for {}: {}", request.email, e);
        SubmitError::Rejected(e)
    })?;

    let owner = db::users::get_user_by_email(&state.db, &request.email)
        .await
        .map_err(SubmitError::database)?;
    if owner.is_none() {
        warn!("Rejected submission for unknown owner {}", request.email);
        return Err(SubmitError::Rejected(NormalizeError::UnknownOwner(
            request.email,
        )));
    }

    let record = db::sessions::insert_session(&state.db, &request.email, chapters)
        .await
        .map_err(SubmitError::database)?;

    info!(
        "Recorded session {} for {}",
        record.session_id, record.owner_email
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Performance data submitted successfully".to_string(),
            session_id: record.session_id,
            created_at: record.created_at,
        }),
    ))
}

/// One recorded session with its derived summary, as listed to clients
#[derive(Debug, Serialize)]
pub struct SessionListing {
    #[serde(flatten)]
    pub record: SessionRecord,
    pub stats: DerivedStats,
}

impl From<SessionRecord> for SessionListing {
    fn from(record: SessionRecord) -> SessionListing {
        let stats = derive(&record);
        SessionListing { record, stats }
    }
}

/// GET /performance/:email
///
/// All recorded sessions for one account, newest first. Trainees may only
/// view their own data; admins may view anyone's.
pub async fn get_performance(
    State(state): State<AppState>,
    Path(email): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<SessionListing>>, SubmitError> {
    if user.email != email && user.role != Role::Admin {
        return Err(SubmitError::Forbidden);
    }

    if db::users::get_user_by_email(&state.db, &email)
        .await
        .map_err(SubmitError::database)?
        .is_none()
    {
        return Err(SubmitError::OwnerNotFound(email));
    }

    let sessions = db::sessions::list_sessions_for(&state.db, &email)
        .await
        .map_err(SubmitError::database)?;

    Ok(Json(sessions.into_iter().map(SessionListing::from).collect()))
}

/// Submission and listing errors
#[derive(Debug)]
pub enum SubmitError {
    Rejected(NormalizeError),
    OwnerNotFound(String),
    Forbidden,
    Database(String),
}

impl SubmitError {
    fn database(err: impl std::fmt::Display) -> SubmitError {
        SubmitError::Database(err.to_string())
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Referential failure is distinct from shape failures
            SubmitError::Rejected(NormalizeError::UnknownOwner(email)) => (
                StatusCode::NOT_FOUND,
                format!("User not found with email: {}", email),
            ),
            SubmitError::Rejected(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            SubmitError::OwnerNotFound(email) => (
                StatusCode::NOT_FOUND,
                format!("User not found with email: {}", email),
            ),
            SubmitError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Not authorized to access this user's data".to_string(),
            ),
            SubmitError::Database(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
