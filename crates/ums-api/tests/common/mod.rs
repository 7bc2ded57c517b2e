use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde::Deserialize;
use tower::ServiceExt;
use ums_api::{ApiState, config::Environment, router};
use ums_db::{InMemoryUserRepository, Operation, RepositoryError, User, UserRepository};

/// Test state builder, backed by the in-memory repository unless another
/// repository is supplied
pub struct TestStateBuilder {
    users: Arc<dyn UserRepository>,
    environment: Environment,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            environment: Environment::Development,
        }
    }

    pub fn with_repository(mut self, users: Arc<dyn UserRepository>) -> Self {
        self.users = users;
        self
    }

    pub fn build(self) -> ApiState {
        ApiState::with_repository(self.users, self.environment)
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Router wired to a fresh in-memory repository
pub fn test_app() -> Router {
    router::router().with_state(TestStateBuilder::new().build())
}

/// Repository whose store is always unreachable
#[derive(Debug, Default)]
pub struct UnavailableUserRepository;

#[async_trait]
impl UserRepository for UnavailableUserRepository {
    async fn create(&self, _email: &str, _name: &str) -> Result<User, RepositoryError> {
        Err(RepositoryError::storage(Operation::Create, "connection refused"))
    }

    async fn get(&self, _id: i64) -> Result<User, RepositoryError> {
        Err(RepositoryError::storage(Operation::Get, "connection refused"))
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Err(RepositoryError::storage(Operation::List, "connection refused"))
    }
}

/// Helper to make requests to the test app
#[derive(Clone)]
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        self.post_raw(uri, json_body).await
    }

    /// Send a POST request with a raw JSON content type and arbitrary body
    pub async fn post_raw(&self, uri: &str, body: impl Into<Body>) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .expect("Failed to build request");

        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }

    /// Value of the `error` field of a JSON error body
    pub fn error_message(&self) -> String {
        let json: serde_json::Value = self.json();
        json["error"]
            .as_str()
            .expect("Error body should have an 'error' string")
            .to_string()
    }
}

/// Test data helpers
pub mod test_data {
    /// Generate a unique email for test isolation
    pub fn unique_email(base: &str) -> String {
        let uuid = uuid::Uuid::new_v4();
        format!("{}+{}@example.com", base, &uuid.to_string()[..8])
    }
}
