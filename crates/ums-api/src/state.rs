use std::sync::Arc;

use sqlx::PgPool;
use ums_db::{PgUserRepository, UserRepository};

use crate::{ApiConfig, config::Environment};

#[derive(Clone)]
pub struct ApiState {
    pub users: Arc<dyn UserRepository>,
    pub environment: Environment,
}

impl ApiState {
    /// State backed by PostgreSQL. The pool is owned by the repository; every
    /// handler borrows it through `users`.
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        Self::with_repository(Arc::new(PgUserRepository::new(pool)), config.env)
    }

    pub fn with_repository(users: Arc<dyn UserRepository>, environment: Environment) -> Self {
        Self { users, environment }
    }
}
