use anyhow::Context;
use tracing_subscriber::EnvFilter;

use roombook_api::{config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    init_tracing(config.api.enable_request_logging);
    tracing::info!("Starting Roombook API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() || config.security.csrf_secret.is_empty() {
        tracing::warn!(
            "JWT_SECRET or CSRF_SECRET is not set; protected routes will reject every request"
        );
    }

    let state = AppState::from_config(config).context("failed to initialise database pool")?;
    let app = roombook_api::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Roombook API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing(request_logging: bool) {
    let default_filter = if request_logging {
        "info,tower_http=debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
