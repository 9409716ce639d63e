//! Admin-only listing endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::auth::{require_admin, AuthError};
use crate::api::sessions::SessionListing;
use crate::api::users::UserResponse;
use crate::api::CurrentUser;
use crate::{db, AppState};

const MAX_PAGE_SIZE: i64 = 100;

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Number of records to skip
    #[serde(default)]
    pub skip: i64,

    /// Maximum number of records to return
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    MAX_PAGE_SIZE
}

impl PageQuery {
    fn clamped(&self) -> (i64, i64) {
        (self.skip.max(0), self.limit.clamp(1, MAX_PAGE_SIZE))
    }
}

/// GET /admin/users
///
/// List all registered accounts. Admin access required.
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<UserResponse>>, AuthError> {
    require_admin(&user)?;

    let (skip, limit) = page.clamped();
    let users = db::users::list_users(&state.db, limit, skip)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /admin/sessions
///
/// List recorded sessions across all accounts, newest first. Admin access
/// required.
pub async fn list_all_sessions(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<SessionListing>>, AuthError> {
    require_admin(&user)?;

    let (skip, limit) = page.clamped();
    let sessions = db::sessions::list_all_sessions(&state.db, limit, skip)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(Json(sessions.into_iter().map(SessionListing::from).collect()))
}
