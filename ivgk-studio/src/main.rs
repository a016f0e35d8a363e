//! ivgk-studio - card preview service
//!
//! Renders digital-card templates with card data into sandboxed preview
//! documents:
//! - `POST /api/preview` serves the document with a CSP sandbox header
//! - `POST /api/preview/embed` returns an `<iframe srcdoc>` embed
//! - `POST /api/preview/qr` turns the embedded QR image into a download

mod api;
mod config;
mod state;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ivgk_studio=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        production = config.is_production(),
        "Starting ivgk-studio (env: {})",
        config.environment
    );

    let addr = config.bind_addr();
    let app = api::create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("ivgk-studio listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("ivgk-studio stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
