use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};
use ums_db::{Operation, User};

use super::model::CreateUserRequest;
use crate::{
    error::ApiError,
    metrics::observe_db_query,
    state::ApiState,
    validation::{validate_email, validate_name, validate_user_id},
};

/// Create the user routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
}

/// Create a new user
///
/// Uniqueness of the email is left to the store; a collision comes back as
/// `409 Conflict`.
async fn create_user(
    State(state): State<ApiState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected create user body");
        ApiError::Validation("Invalid request body".to_string())
    })?;

    validate_email(&payload.email)?;
    validate_name(&payload.name)?;

    let user = observe_db_query(
        Operation::Create,
        state.users.create(&payload.email, &payload.name),
    )
    .await?;

    tracing::info!(user_id = user.id, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get user by ID
async fn get_user(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::Validation("Invalid user ID".to_string()))?;
    validate_user_id(id)?;

    let user = observe_db_query(Operation::Get, state.users.get(id)).await?;

    Ok(Json(user))
}

/// Get all users
async fn list_users(State(state): State<ApiState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = observe_db_query(Operation::List, state.users.list()).await?;

    Ok(Json(users))
}
