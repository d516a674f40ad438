//! Serve command - runs the chat API until SIGINT/SIGTERM

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::service::ChatService;

pub async fn run() -> anyhow::Result<()> {
    let config = load_config()?;

    let service = ChatService::build(&config)?;

    let addr = build_socket_addr(&config)?;
    let listener = TcpListener::bind(addr).await?;
    info!("Starting chat service on {}", addr);
    info!("  POST /chat    - chat through the compiled chain");
    info!("  GET  /health  - service identity");

    service.serve(listener, shutdown_signal()).await?;

    info!("Server gracefully stopped");
    Ok(())
}

/// Load `.env`, configuration and logging. A present but invalid source aborts startup.
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("invalid configuration")?;
    logging::init_logging(&config.logging)?;

    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
