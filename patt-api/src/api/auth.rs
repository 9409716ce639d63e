//! Bearer-token authentication for protected endpoints
//!
//! Handlers that need an identity take a `CurrentUser` extractor argument;
//! it validates the Authorization header, decodes the access token, and loads
//! the account it names. Missing or bad credentials reject with 401 before
//! the handler body runs.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use patt_common::auth::decode_access_token;
use patt_common::db::{Role, User};

use crate::{db, AppState};

/// The authenticated account behind the current request
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingToken)?;

        let email = decode_access_token(token, &state.signing_secret)
            .ok_or(AuthError::InvalidToken)?;

        // Token may outlive the account it was issued for
        let user = db::users::get_user_by_email(&state.db, &email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidToken)?;

        Ok(CurrentUser(user))
    }
}

/// Reject unless the account has the Admin role
pub fn require_admin(user: &User) -> Result<(), AuthError> {
    if user.role != Role::Admin {
        warn!("Admin endpoint refused for {}", user.email);
        return Err(AuthError::Forbidden(
            "Not enough permissions. Admin access required.".to_string(),
        ));
    }
    Ok(())
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    Forbidden(String),
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Missing bearer token".to_string(),
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Could not validate credentials".to_string(),
            ),
            AuthError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AuthError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Authentication error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
