use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record as stored in the `users` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Store-assigned identity, never supplied by clients
    pub id: i64,
    /// Case-sensitive email, unique across all users
    pub email: String,
    /// Display name
    pub name: String,
    /// Set by the store on insert
    pub created_at: DateTime<Utc>,
}
