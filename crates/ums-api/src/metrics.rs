//! Prometheus metrics for monitoring API performance and repository health.

use std::{
    sync::LazyLock,
    time::Instant,
};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{Gauge, counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;
use ums_db::Operation;

static NUMERIC_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/-?\d+").expect("numeric segment regex is valid"));

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    // Request and query durations, in seconds
    let buckets = [
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
    ];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("db_query_duration_seconds".to_string()),
            &buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Counts a request as in flight until dropped, so a request abandoned by
/// the client is still released.
struct InFlight(Gauge);

impl InFlight {
    fn enter(gauge: Gauge) -> Self {
        gauge.increment(1.0);
        Self(gauge)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.decrement(1.0);
    }
}

/// Middleware to record HTTP request metrics
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let in_flight = InFlight::enter(
        gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone()),
    );

    let response = next.run(req).await;

    drop(in_flight);

    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Replace numeric ids in the path with a placeholder to keep label
/// cardinality bounded.
fn normalize_path(path: &str) -> String {
    NUMERIC_SEGMENT.replace_all(path, "/:id").into_owned()
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Record database query metrics
pub fn record_db_query(operation: Operation, duration_secs: f64, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        "db_queries_total",
        "query" => operation.as_str(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "db_query_duration_seconds",
        "query" => operation.as_str()
    )
    .record(duration_secs);
}

/// Time a repository call and record its outcome.
pub async fn observe_db_query<T, E, F>(operation: Operation, query: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let result = query.await;
    record_db_query(operation, start.elapsed().as_secs_f64(), result.is_ok());
    result
}

#[cfg(test)]
mod tests {
    use std::{pin::pin, task::Context};

    use axum::{Router, body::Body, middleware, routing::get};
    use futures::task::noop_waker_ref;
    use tower::ServiceExt;

    use super::*;

    /// Current value of the in-flight gauge for `GET /slow`
    fn in_flight(handle: &PrometheusHandle) -> Option<f64> {
        handle
            .render()
            .lines()
            .find(|line| line.starts_with("http_requests_in_flight{") && line.contains("/slow"))
            .and_then(|line| line.rsplit(' ').next())
            .and_then(|value| value.parse().ok())
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/users/123"), "/users/:id");
        assert_eq!(normalize_path("/users/-4"), "/users/:id");
        assert_eq!(normalize_path("/users"), "/users");
        assert_eq!(normalize_path("/health"), "/health");
    }

    #[tokio::test]
    async fn test_observe_db_query_passes_result_through() {
        let ok: Result<u8, &str> = observe_db_query(Operation::Get, async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<u8, &str> = observe_db_query(Operation::List, async { Err("down") }).await;
        assert_eq!(err, Err("down"));
    }

    #[test]
    fn test_in_flight_released_when_request_is_dropped() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        let app = Router::new()
            .route("/slow", get(|| std::future::pending::<&'static str>()))
            .layer(middleware::from_fn(track_metrics));

        metrics::with_local_recorder(&recorder, || {
            let request = axum::http::Request::builder()
                .uri("/slow")
                .body(Body::empty())
                .unwrap();
            let mut response = pin!(app.oneshot(request));
            let mut cx = Context::from_waker(noop_waker_ref());

            assert!(response.as_mut().poll(&mut cx).is_pending());
            assert_eq!(in_flight(&handle), Some(1.0));
        });

        // The client went away: the pinned future above has been dropped.
        assert_eq!(in_flight(&handle), Some(0.0));
    }
}
