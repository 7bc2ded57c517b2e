//! In-memory [`UserRepository`] for fast tests.
//!
//! It mirrors the guarantees of the PostgreSQL table: ids are assigned by the
//! repository and never reused, emails are unique (case-sensitive), and a
//! duplicate insert is rejected with [`RepositoryError::DuplicateEmail`].
//! Text containing NUL fails as a storage error, as PostgreSQL refuses it.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use tokio::sync::Mutex;

use crate::{
    models::User,
    repository::{Operation, RepositoryError, UserRepository},
    schema::USERS_EMAIL_CONSTRAINT,
};

/// Stand-in for the store's unique-constraint rejection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate key value violates unique constraint \"{constraint}\"")]
pub struct ConstraintViolation {
    pub constraint: &'static str,
}

/// Stand-in for the store refusing a NUL byte in a text value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid byte sequence for encoding \"UTF8\": 0x00")]
pub struct InvalidText;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, User>,
    emails: HashSet<String>,
    last_id: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, email: &str, name: &str) -> Result<User, RepositoryError> {
        if email.contains('\0') || name.contains('\0') {
            return Err(RepositoryError::storage(Operation::Create, InvalidText));
        }

        let mut table = self.table.lock().await;

        // Check and insert under one lock, like the store's constraint.
        if !table.emails.insert(email.to_owned()) {
            return Err(RepositoryError::duplicate_email(
                email,
                ConstraintViolation {
                    constraint: USERS_EMAIL_CONSTRAINT,
                },
            ));
        }

        table.last_id += 1;
        let user = User {
            id: table.last_id,
            email: email.to_owned(),
            name: name.to_owned(),
            // Postgres keeps microsecond precision
            created_at: Utc::now().trunc_subsecs(6),
        };
        table.rows.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get(&self, id: i64) -> Result<User, RepositoryError> {
        self.table
            .lock()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound { id })
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }
}
