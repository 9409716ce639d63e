//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Trainee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Trainee => "Trainee",
            Role::Admin => "Admin",
        }
    }

    /// Parse a role string (exact match)
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "Trainee" => Some(Role::Trainee),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored user account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub trainee_name: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_exact() {
        assert_eq!(Role::parse("Trainee"), Some(Role::Trainee));
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("Superuser"), None);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            email: "r@x.com".to_string(),
            password_hash: "salt$digest".to_string(),
            role: Role::Trainee,
            trainee_name: "Red Adair".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("salt$digest"));
        assert!(!json.contains("password_hash"));
    }
}
