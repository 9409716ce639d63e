//! PDF report download endpoint

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use patt_common::db::Role;
use patt_common::report::{render_course_report, ReportError};
use patt_common::stats::derive;

use crate::api::CurrentUser;
use crate::{db, AppState};

/// GET /report/:session_id
///
/// Generate and download the course progress report for one session.
/// Trainees may only download their own reports; admins may download any.
pub async fn download_report(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, ReportApiError> {
    let record = db::sessions::get_session(&state.db, session_id)
        .await
        .map_err(ReportApiError::database)?
        .ok_or(ReportApiError::SessionNotFound(session_id))?;

    if user.email != record.owner_email && user.role != Role::Admin {
        return Err(ReportApiError::Forbidden);
    }

    let owner = db::users::get_user_by_email(&state.db, &record.owner_email)
        .await
        .map_err(ReportApiError::database)?
        .ok_or_else(|| ReportApiError::Database("session owner account missing".to_string()))?;

    let stats = derive(&record);
    let bytes = render_course_report(&owner.trainee_name, &record, &stats).map_err(|e| {
        // Canonical-layout violations are upstream defects, not user errors
        error!("Report synthesis failed for session {}: {}", session_id, e);
        ReportApiError::Synthesis(e)
    })?;

    let filename = format!(
        "PiperAlpha_Report_{}_{}.pdf",
        owner.trainee_name.replace(' ', "_"),
        record.created_at.format("%Y%m%d_%H%M%S")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Report endpoint errors
#[derive(Debug)]
pub enum ReportApiError {
    SessionNotFound(Uuid),
    Forbidden,
    Synthesis(ReportError),
    Database(String),
}

impl ReportApiError {
    fn database(err: impl std::fmt::Display) -> ReportApiError {
        ReportApiError::Database(err.to_string())
    }
}

impl IntoResponse for ReportApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ReportApiError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Performance session not found with ID: {}", id),
            ),
            ReportApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Not authorized to download this report".to_string(),
            ),
            ReportApiError::Synthesis(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Report synthesis failed: {}", err),
            ),
            ReportApiError::Database(msg) => (
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
