use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Environment;

/// Create the CORS layer for the user API.
///
/// With no configured origins, development falls back to a permissive layer
/// and production allows no cross-origin callers. Origins that are not valid
/// header values are skipped with a warning.
pub fn create_cors_layer(allowed_origins: &[String], environment: Environment) -> CorsLayer {
    if allowed_origins.is_empty() && environment.is_development() {
        return CorsLayer::very_permissive();
    }

    let origins = allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
