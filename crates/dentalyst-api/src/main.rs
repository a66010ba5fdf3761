//! # dentalyst-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from the
//! environment: `PORT` (default 5001), `DATABASE_URL` (absent means the
//! in-memory store), and `ALLOWED_ORIGINS` (comma-separated CORS
//! allow-list).

use dentalyst_api::{AppConfig, AppState};
use dentalyst_store::ConnectionManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5001);

    let allowed_origins: Vec<String> = std::env::var("ALLOWED_ORIGINS")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let config = AppConfig {
        port,
        allowed_origins,
    };

    let state = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let manager = ConnectionManager::new(&url)?;
            // Reconnect loop runs for the life of the process; requests
            // fail fast with 503 until the first successful connect.
            manager.spawn_monitor();
            AppState::with_postgres(config, manager)
        }
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — using the in-memory store. \
                 Records will not survive restarts."
            );
            AppState::with_config(config)
        }
    };

    let app = dentalyst_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Dentalyst API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
