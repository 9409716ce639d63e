//! Account registration, login, and identity endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use patt_common::auth::{create_access_token, hash_password, verify_password};
use patt_common::db::{Role, User};

use crate::api::CurrentUser;
use crate::{db, AppState};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
    pub trainee_name: String,
}

/// Public view of an account
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub role: Role,
    pub trainee_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> UserResponse {
        UserResponse {
            email: user.email,
            role: user.role,
            trainee_name: user.trainee_name,
            created_at: user.created_at,
        }
    }
}

/// POST /register
///
/// Register a new trainee or admin account. Email must be unique.
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), UserError> {
    if !request.email.contains('@') {
        return Err(UserError::InvalidEmail(request.email));
    }
    if request.password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserError::WeakPassword);
    }
    let role = Role::parse(&request.role).ok_or(UserError::InvalidRole(request.role.clone()))?;
    if request.trainee_name.trim().is_empty() {
        return Err(UserError::MissingName);
    }

    if db::users::get_user_by_email(&state.db, &request.email)
        .await
        .map_err(UserError::database)?
        .is_some()
    {
        return Err(UserError::EmailTaken);
    }

    let password_hash = hash_password(&request.password);
    let user = db::users::create_user(
        &state.db,
        &request.email,
        &password_hash,
        role,
        request.trainee_name.trim(),
    )
    .await
    .map_err(UserError::database)?;

    info!("Registered {} account for {}", user.role, user.email);
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Access token response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /login
///
/// Authenticate with email and password to receive a bearer access token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, UserError> {
    let user = db::users::get_user_by_email(&state.db, &request.email)
        .await
        .map_err(UserError::database)?;

    // Same rejection for unknown email and wrong password
    let user = match user {
        Some(user) if verify_password(&request.password, &user.password_hash) => user,
        _ => return Err(UserError::BadCredentials),
    };

    let access_token = create_access_token(&user.email, &state.signing_secret)
        .map_err(UserError::database)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /me
///
/// Return the account behind the presented access token.
pub async fn read_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// Account endpoint errors
#[derive(Debug)]
pub enum UserError {
    InvalidEmail(String),
    WeakPassword,
    InvalidRole(String),
    MissingName,
    EmailTaken,
    BadCredentials,
    Database(String),
}

impl UserError {
    fn database(err: impl std::fmt::Display) -> UserError {
        UserError::Database(err.to_string())
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            UserError::InvalidEmail(email) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid email address: {}", email),
            ),
            UserError::WeakPassword => (
                StatusCode::BAD_REQUEST,
                format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
            ),
            UserError::InvalidRole(role) => (
                StatusCode::BAD_REQUEST,
                format!("Role must be 'Trainee' or 'Admin', got {:?}", role),
            ),
            UserError::MissingName => {
                (StatusCode::BAD_REQUEST, "Trainee name is required".to_string())
            }
            UserError::EmailTaken => {
                (StatusCode::BAD_REQUEST, "Email already registered".to_string())
            }
            UserError::BadCredentials => (
                StatusCode::UNAUTHORIZED,
                "Incorrect email or password".to_string(),
            ),
            UserError::Database(msg) => (
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
