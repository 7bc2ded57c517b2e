use serde::{Deserialize, Serialize};

/// Body of `POST /users`
///
/// Missing fields deserialize to empty strings so they are reported by
/// validation rather than as a JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}
