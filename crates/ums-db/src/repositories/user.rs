use sqlx::{Executor, Postgres};

use crate::models::User;

/// Insert a user and return the stored row, including the store-assigned
/// `id` and `created_at`.
///
/// The uniqueness of `email` is checked by the `users_email_key` constraint in
/// the same statement, so concurrent inserts can never both succeed.
pub async fn insert<'e, E>(executor: E, email: &str, name: &str) -> Result<User, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO users (email, name)
            VALUES ($1, $2)
            RETURNING id, email, name, created_at
        "#,
    )
    .bind(email)
    .bind(name)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, user_id: i64) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_all<'e, E>(executor: E) -> Result<Vec<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, email, name, created_at
            FROM users
            ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
}
