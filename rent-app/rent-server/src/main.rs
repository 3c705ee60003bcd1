use std::future::Future;
use std::net::SocketAddr;

use tracing::{error, info};

use rent_api::{build_router, cors_layer, AppState};
use rent_infrastructure::build_repositories;
use rent_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry; the guard flushes file logs on drop
    let _log_guard = rent_shared::telemetry::init_telemetry(&config.logging)?;

    info!("{} starting ({})...", config.app.name, config.app.env);

    let repos = match build_repositories(&config.database).await {
        Ok(repos) => repos,
        Err(e) => {
            error!("Failed to initialize persistence: {:#}", e);
            return Err(e);
        }
    };
    info!("Persistence gateway ready ({:?} backend)", config.database.backend);

    let app = build_router(AppState::new(repos)).layer(cors_layer(&config.cors));

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            // without a signal handler, run until the process is killed
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_signal_starts_shutdown() {
        let waited = tokio::time::timeout(
            Duration::from_millis(100),
            wait_for_shutdown(async { Ok(()) }),
        )
        .await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn test_failed_signal_registration_keeps_serving() {
        let waited = tokio::time::timeout(
            Duration::from_millis(100),
            wait_for_shutdown(async { Err(std::io::Error::other("no signal handler")) }),
        )
        .await;
        assert!(waited.is_err());
    }
}
