//! Serve command - runs the customer API server

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use super::ServeArgs;
use crate::api::create_router;
use crate::config::AppConfig;
use crate::infrastructure::observability::{init_metrics, init_tracing, shutdown_tracing};

/// Run the API server until a shutdown signal arrives
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = load_config()?;
    apply_overrides(&mut config, &args);

    init_tracing(&config.logging, &config.observability.tracing);

    let state = crate::create_app_state_with_config(&config).await?;
    let metrics = init_metrics(&config.observability.metrics);
    let app = create_router(state, metrics);

    let addr = build_socket_addr(&config)?;
    info!("Starting customer API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracing();
    info!("Customer API server shutdown complete");

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &ServeArgs) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }

    if let Some(port) = args.port {
        config.server.port = port;
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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

/// Invalid configuration stops startup instead of falling back to defaults
fn load_config() -> anyhow::Result<AppConfig> {
    AppConfig::load().context("Failed to load configuration from config/ and APP__* variables")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_loaded_values() {
        let mut config = AppConfig::default();
        let args = ServeArgs {
            host: Some("127.0.0.1".to_string()),
            port: Some(5000),
        };

        apply_overrides(&mut config, &args);

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &ServeArgs::default());

        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_config_reads_default_file() {
        let config = load_config().unwrap();
        assert_eq!(config.observability.tracing.service_name, "northwind-customers");
    }

    #[test]
    fn test_build_socket_addr() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 3000;

        let addr = build_socket_addr(&config).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_build_socket_addr_rejects_hostname() {
        let mut config = AppConfig::default();
        config.server.host = "not an ip".to_string();

        assert!(build_socket_addr(&config).is_err());
    }
}
