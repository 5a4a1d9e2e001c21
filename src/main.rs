use anyhow::Context;
use axum_timesheet::{build_router, AppState, Config};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize basic tracing subscriber
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    std::fs::create_dir_all(&config.storage.data_dir)
        .with_context(|| format!("Failed to create data directory {}", config.storage.data_dir))?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server running on {}", addr);
    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
