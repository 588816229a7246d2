//! Account and saved-progress records for the auth/progress backend

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Stored user row
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    /// Lower-cased, unique
    pub email: String,
    /// Hex SHA-256 of salt + password
    pub password_hash: String,
    pub salt: String,
    pub name: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned to clients. Credentials never leave the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: u64,
    pub email: String,
    pub name: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            name: u.name.clone(),
            email_verified: u.email_verified,
            created_at: u.created_at,
        }
    }
}

/// Saved game progress. The two payload fields are opaque to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameProgress {
    pub user_id: u64,
    pub vault_progress: String,
    /// Serialized list, stored as-is
    pub unlocked_modules: String,
    pub last_played: DateTime<Utc>,
}

impl GameProgress {
    pub fn empty(user_id: u64) -> Self {
        Self {
            user_id,
            vault_progress: String::new(),
            unlocked_modules: "[]".to_string(),
            last_played: Utc::now(),
        }
    }
}
