use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered shopper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,

    /// Login identifier, compared case-insensitively
    pub email: String,

    pub display_name: String,

    /// Hex SHA-256 of salt + password
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[serde(skip_serializing)]
    pub salt: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, display_name: String, password_hash: String, salt: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash,
            salt,
            created_at: Utc::now(),
        }
    }
}

/// An authenticated login, identified by an opaque token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
