pub mod memory;
pub mod models;
pub mod repositories;
pub mod repository;
pub mod schema;

pub use memory::InMemoryUserRepository;
pub use models::User;
pub use repository::{Operation, PgUserRepository, RepositoryError, UserRepository};

use anyhow::Context;
use sqlx::{PgPool, Postgres, migrate::MigrateDatabase, postgres::PgPoolOptions};

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

/// Ensure the database exists.
pub async fn ensure_db(database_url: &str) -> anyhow::Result<()> {
    // No-op if it already does
    let exists = Postgres::database_exists(database_url)
        .await
        .context("failed to check database existence")?;
    if !exists {
        tracing::info!("Database does not exist, creating it");
        Postgres::create_database(database_url)
            .await
            .context("failed to create database")?;
    }

    Ok(())
}

/// Apply the users schema. Safe to call repeatedly.
pub async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::raw_sql(schema::USERS_SCHEMA)
        .execute(pool)
        .await
        .context("failed to apply users schema")?;

    Ok(())
}
