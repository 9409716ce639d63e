//! User account queries

use sqlx::SqlitePool;

use patt_common::db::{Role, User};
use patt_common::{time, Error, Result};

use super::parse_timestamp;

type UserRow = (String, String, String, String, String);

fn user_from_row(row: UserRow) -> Result<User> {
    let (email, password_hash, role, trainee_name, created_at) = row;
    let role = Role::parse(&role)
        .ok_or_else(|| Error::Internal(format!("Invalid stored role {:?}", role)))?;
    Ok(User {
        email,
        password_hash,
        role,
        trainee_name,
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Insert a new account and return it
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    role: Role,
    trainee_name: &str,
) -> Result<User> {
    let created_at = time::now();

    sqlx::query(
        "INSERT INTO users (email, password_hash, role, trainee_name, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(trainee_name)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(User {
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        role,
        trainee_name: trainee_name.to_string(),
        created_at,
    })
}

/// Look up an account by email
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT email, password_hash, role, trainee_name, created_at
         FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(user_from_row).transpose()
}

/// List accounts ordered by email
pub async fn list_users(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<User>> {
    let rows: Vec<UserRow> = sqlx::query_as(
        "SELECT email, password_hash, role, trainee_name, created_at
         FROM users ORDER BY email LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(user_from_row).collect()
}
