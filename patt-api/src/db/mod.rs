//! Database queries for patt-api

pub mod sessions;
pub mod users;

use chrono::{DateTime, Utc};
use patt_common::{Error, Result};

/// Parse a stored RFC 3339 timestamp column
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Invalid stored timestamp {:?}: {}", value, e)))
}
