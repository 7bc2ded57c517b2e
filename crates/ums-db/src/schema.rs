/// Database schema for the user service
///
/// Every statement is idempotent so the schema can be applied on each startup
/// and by every test that provisions a fresh database schema.

/// Name of the unique constraint guarding `users.email`.
///
/// Repository code matches on this name to tell an email collision apart from
/// any other constraint failure.
pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// SQL schema for users table
pub const USERS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    email VARCHAR(255) NOT NULL,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT users_email_key UNIQUE (email)
);
"#;

/// Maximum length accepted by the `email` and `name` columns.
pub const MAX_TEXT_LEN: usize = 255;
