//! # Mercato REST API server binary
//!
//! Boot sequence: tracing → config → PostgreSQL (+migrations) → Redis
//! client → shared state → axum router → serve with graceful shutdown.

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use mercato_db::{CsvCache, Database, DbConfig};
use mercato_rest_api::auth::JwtManager;
use mercato_rest_api::{app, ApiConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional; the environment wins
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Mercato REST API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.http_port,
        db_url = %config.database_url.chars().take(30).collect::<String>(),
        "Configuration loaded"
    );

    // Connect to database and run migrations
    let db = Database::connect(DbConfig::new(config.database_url.as_str())).await?;
    info!("Connected to PostgreSQL, migrations complete");

    // Open the Redis client backing the CSV export cache
    let csv_cache = CsvCache::new(&config.redis_url)?;
    info!("Redis client ready");

    // JWT manager: secret and algorithm loaded once for the process
    let jwt = JwtManager::new(
        config.jwt_secret.clone(),
        &config.jwt_algorithm,
        config.jwt_lifetime_days,
    )?;

    // Create shared state and the router
    let state = AppState {
        db,
        csv_cache,
        jwt,
        config: config.clone(),
    };
    let router = app(state);

    // Serve
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
