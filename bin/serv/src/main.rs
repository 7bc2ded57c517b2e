use axum::{Router, routing::get};
use tokio::signal;
use ums_api::{
    config::ApiConfig,
    metrics::{init_metrics, metrics_handler},
    router,
    state::ApiState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    ums_api::tracing::init_tracing(&config.env);
    tracing::debug!(?config, "Loaded configuration");

    let metrics_handle = init_metrics()?;

    // Database and schema setup, both idempotent
    ums_db::ensure_db(&config.database_url).await?;
    let pool = ums_db::create_pool(&config.database_url, config.db_max_connections).await?;
    ums_db::ensure_schema(&pool).await?;

    let state = ApiState::new(&config, pool.clone());

    let app = router::apply_middleware(router::router().with_state(state), &config).merge(
        Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(metrics_handle),
    );

    let listener = tokio::net::TcpListener::bind(config.socket_addr()?).await?;
    tracing::info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
