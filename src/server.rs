//! Process bootstrap: configuration, telemetry, storage, then the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::application::{build_router, AppState};
use crate::cli::ServeArgs;
use crate::config::{AppConfig, DatabaseLocation};
use crate::db::{create_connection_pool, get_connection, verify_database_integrity};
use crate::services::{GradeNotificationService, LoggingGradeListener};
use crate::telemetry;

pub async fn run(mut args: ServeArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("loading configuration")?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(database) = args.database.take() {
        config.database.location = DatabaseLocation::parse(&database.to_string_lossy());
    }

    telemetry::init(&config.telemetry)?;

    // 1. INFRASTRUCTURE
    let pool = Arc::new(create_connection_pool(&config.database)?);
    verify_database_integrity(&*get_connection(&pool)?).context("database integrity check")?;

    // 2. NOTIFICATIONS
    let notifications = Arc::new(GradeNotificationService::new());
    notifications.register_global(Arc::new(LoggingGradeListener));

    // 3. REPOSITORIES + SERVICES + SCHEMA
    let state = AppState::initialize(pool, notifications)?;

    // 4. HTTP
    let app = build_router(state);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!(%addr, database = ?config.database.location, "studenthub ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("studenthub stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for shutdown signal");
    }
}
