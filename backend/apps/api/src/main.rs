//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;

use std::sync::Arc;

use anyhow::Context;
use auth::{AuthConfig, PgUserRepository, TokenService};
use links::{EnrichmentConfig, EnrichmentQueue, PgLinkRepository};
use platform::config::DeploymentMode;
use platform::http::ReqwestFetcher;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,links=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration; a missing secret outside development stops startup here
    let mode = DeploymentMode::from_env()?;
    let server_config = ServerConfig::from_env()?;
    let auth_config = AuthConfig::from_env(mode)?;
    let enrichment_config = EnrichmentConfig::from_env()?;

    tracing::info!(?mode, ?enrichment_config, "Configuration loaded");

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&server_config.database_url)
        .await
        .context("connecting to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let users = PgUserRepository::new(pool.clone());
    let links = Arc::new(PgLinkRepository::new(pool.clone()));
    let tokens = Arc::new(TokenService::new(&auth_config));

    let fetcher = ReqwestFetcher::new(
        enrichment_config.fetch_timeout,
        enrichment_config.max_body_bytes,
    )
    .context("building HTTP client")?;
    let (enrichment, dispatcher) =
        EnrichmentQueue::start(links.clone(), fetcher, &enrichment_config);

    let app = app::build_router(
        users,
        links,
        tokens,
        enrichment,
        server_config.frontend_origins.clone(),
    );

    // Start server
    tracing::info!("Listening on {}", server_config.bind_addr);

    let listener = TcpListener::bind(server_config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and its queue handle) is gone; let running fetches finish
    if let Err(e) = dispatcher.await {
        tracing::error!(error = %e, "Enrichment dispatcher failed");
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
