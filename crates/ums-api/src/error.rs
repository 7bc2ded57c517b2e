use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use ums_db::RepositoryError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("User not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("Internal server error")]
    Storage(#[source] RepositoryError),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail { .. } => {
                Self::Conflict("A user with this email already exists".to_string())
            }
            RepositoryError::NotFound { .. } => Self::NotFound,
            storage @ RepositoryError::Storage { .. } => Self::Storage(storage),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Storage details stay in the logs
        if let Self::Storage(err) = &self {
            tracing::error!(error = ?err, "Storage failure");
        }

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ums_db::Operation;

    #[test]
    fn test_repository_errors_map_to_status() {
        let cases = [
            (
                RepositoryError::duplicate_email("a@x.com", "dup"),
                StatusCode::CONFLICT,
            ),
            (RepositoryError::NotFound { id: 1 }, StatusCode::NOT_FOUND),
            (
                RepositoryError::storage(Operation::List, "connection reset"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_storage_error_message_is_generic() {
        let err = ApiError::from(RepositoryError::storage(
            Operation::Create,
            "password authentication failed for user \"postgres\"",
        ));

        assert_eq!(err.to_string(), "Internal server error");
    }
}
