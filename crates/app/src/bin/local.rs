// Assetsync - Local Update Daemon

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use assetsync_app::AssetSync;
use assetsync_common::config::{Config, DEFAULT_RUST_LOG};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_RUST_LOG)),
        )
        .pretty()
        .init();

    info!("Starting Assetsync update daemon");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(?config, "Configuration loaded successfully");

    let sync = AssetSync::bootstrap(&config).await.map_err(|e| {
        error!("Failed to bootstrap catalogs: {}", e);
        e
    })?;

    let mut ticker = tokio::time::interval(config.update_interval);
    // The first tick completes immediately; bootstrap already loaded everything
    ticker.tick().await;

    info!(
        interval_secs = config.update_interval.as_secs(),
        "Checking for asset updates periodically"
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let notified = sync.check_for_updates().await;
                info!(notified, "Published update check");
                for summary in sync.summaries() {
                    info!(
                        category = %summary.category,
                        status = %summary.status,
                        total = summary.total,
                        local = summary.local,
                        remote_only = summary.remote_only,
                        "Catalog status"
                    );
                }
            }
        }
    }

    sync.shutdown().await;
    info!("Daemon shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
