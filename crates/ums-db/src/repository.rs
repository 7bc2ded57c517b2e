//! Repository contract between the application and the `users` table.
//!
//! [`UserRepository`] is the only way application code reaches user rows. It
//! never checks for an existing email before inserting: the
//! `users_email_key` constraint is the single source of truth, and a
//! violation of it is reported as [`RepositoryError::DuplicateEmail`].
//! Every other store failure becomes [`RepositoryError::Storage`], tagged
//! with the [`Operation`] that was attempted.

use std::fmt;

use async_trait::async_trait;
use sqlx::{PgPool, error::ErrorKind};

use crate::{models::User, repositories, schema::USERS_EMAIL_CONSTRAINT};

/// Boxed source error carried by [`RepositoryError`] variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Repository operation, used to label storage failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
    List,
}

impl Operation {
    /// Stable name for logs and metrics labels
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create_user",
            Self::Get => "get_user",
            Self::List => "list_users",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The email is already taken. Not retryable.
    #[error("a user with email {email:?} already exists")]
    DuplicateEmail {
        email: String,
        #[source]
        source: BoxError,
    },
    /// No user has this id.
    #[error("user {id} not found")]
    NotFound { id: i64 },
    /// Connectivity, transport, or unexpected store failure. May be transient.
    #[error("{operation} failed in storage")]
    Storage {
        operation: Operation,
        #[source]
        source: BoxError,
    },
}

impl RepositoryError {
    pub fn storage(operation: Operation, source: impl Into<BoxError>) -> Self {
        Self::Storage {
            operation,
            source: source.into(),
        }
    }

    pub fn duplicate_email(email: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
            source: source.into(),
        }
    }

    pub const fn is_duplicate_email(&self) -> bool {
        matches!(self, Self::DuplicateEmail { .. })
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Create, fetch, and list users.
///
/// Implementations must enforce email uniqueness atomically: N concurrent
/// `create` calls with the same email yield exactly one `Ok` and N-1
/// [`RepositoryError::DuplicateEmail`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. `email` and `name` are expected to be validated by the caller.
    async fn create(&self, email: &str, name: &str) -> Result<User, RepositoryError>;

    /// Fetch a user by id, or [`RepositoryError::NotFound`].
    async fn get(&self, id: i64) -> Result<User, RepositoryError>;

    /// Snapshot of all users, ordered by id. Empty when there are none.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;
}

/// PostgreSQL-backed [`UserRepository`].
///
/// Holds only a pool handle. Each call checks out one connection, and the
/// pool guard returns it on every exit path, including when the calling
/// future is dropped mid-query.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, email: &str, name: &str) -> Result<User, RepositoryError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepositoryError::storage(Operation::Create, e))?;

        repositories::user::insert(&mut *conn, email, name)
            .await
            .map_err(|e| map_insert_error(e, email))
    }

    async fn get(&self, id: i64) -> Result<User, RepositoryError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepositoryError::storage(Operation::Get, e))?;

        repositories::user::find_by_id(&mut *conn, id)
            .await
            .map_err(|e| RepositoryError::storage(Operation::Get, e))?
            .ok_or(RepositoryError::NotFound { id })
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepositoryError::storage(Operation::List, e))?;

        repositories::user::find_all(&mut *conn)
            .await
            .map_err(|e| RepositoryError::storage(Operation::List, e))
    }
}

/// Classify an insert failure using the driver's structured error kind.
fn map_insert_error(error: sqlx::Error, email: &str) -> RepositoryError {
    let conflict = matches!(
        &error,
        sqlx::Error::Database(db) if is_email_conflict(db.kind(), db.constraint())
    );

    if conflict {
        tracing::debug!(constraint = USERS_EMAIL_CONSTRAINT, "email already taken");
        RepositoryError::duplicate_email(email, error)
    } else {
        RepositoryError::storage(Operation::Create, error)
    }
}

/// A unique violation counts as an email conflict when it names the email
/// constraint. Postgres always reports the constraint name; an unnamed unique
/// violation can only come from the email column since `id` is store-assigned.
fn is_email_conflict(kind: ErrorKind, constraint: Option<&str>) -> bool {
    matches!(kind, ErrorKind::UniqueViolation)
        && constraint.is_none_or(|name| name == USERS_EMAIL_CONSTRAINT)
}
