//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::commands::jobs::email_storage;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::db::SchemaPolicy;
use crate::infra::{
    Cache, Database, HealthCheck, HttpRecommender, LocalFileStorage, LogMailer, Mailer,
    Persistence, QueuedMailer,
};
use crate::services::Services;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Arc::new(
        Database::open(&config, SchemaPolicy::Migrate)
            .await
            .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?,
    );

    let cache = Arc::new(
        Cache::connect(&config)
            .await
            .map_err(|e| AppError::internal(format!("Redis connection failed: {}", e)))?,
    );

    let mailer: Arc<dyn Mailer> = if config.email_queue_enabled {
        Arc::new(QueuedMailer::new(email_storage(&config).await?))
    } else {
        tracing::warn!("EMAIL_QUEUE_ENABLED is off; emails will only be logged");
        Arc::new(LogMailer)
    };

    let storage = Arc::new(LocalFileStorage::new(&config.upload_dir));
    let recommender = Arc::new(HttpRecommender::new(&config.recommender_url)?);
    let uow = Arc::new(Persistence::new(db.pool()));
    let services = Services::new(uow, &config, mailer, storage, recommender);

    let health_checks = vec![
        db as Arc<dyn HealthCheck>,
        cache.clone() as Arc<dyn HealthCheck>,
    ];
    let app_state = AppState::new(Arc::new(services), cache, health_checks);

    let app = create_router(app_state, &config);

    let host = args.host.unwrap_or_else(|| config.server_host.clone());
    let port = args.port.unwrap_or(config.server_port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal, draining connections...");
}
