use axum::{Json, Router, http::StatusCode, middleware, response::IntoResponse, routing::get};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    ApiConfig,
    metrics::track_metrics,
    middleware::{
        cors::create_cors_layer, request_id::request_id_middleware,
        security_headers::apply_security_headers,
    },
    state::ApiState,
    user,
};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .merge(user::routes())
        .fallback(handler_404)
}

/// Wrap a finished router with the HTTP middleware stack.
///
/// Layers run outermost first: request id span, tracing, metrics, CORS,
/// security headers.
pub fn apply_middleware(router: Router, config: &ApiConfig) -> Router {
    apply_security_headers(router, config.env)
        .layer(create_cors_layer(&config.allowed_origins, config.env))
        .layer(middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "The requested resource was not found" })),
    )
}
