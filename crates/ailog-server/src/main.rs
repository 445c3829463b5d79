//! AI Log Server
//!
//! Run with: cargo run -p ailog-server

use std::net::SocketAddr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ailog_server::{config::ServerConfig, router::build_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ServerConfig::from_env();
    let port = config.port;
    info!("Starting AI log server...");
    info!("📁 Log dir:  {}", config.log_dir.display());
    info!("📄 Log file: {}", config.log_file_path().display());

    let state = AppState::new(config)?;
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Log server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
