//! MailCode dispatcher worker
//!
//! Drains the delivery queue and sends verification emails until SIGINT or
//! SIGTERM. Configured entirely from `config.<environment>.toml`, `.env` and
//! `MAILCODE__*` environment variables.

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::info;

use mc_shared::config::AppConfig;

mod bootstrap;
mod telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.logging)?;

    info!(
        environment = ?config.environment,
        queue_backend = ?config.queue.backend,
        email_provider = ?config.email.provider,
        version = env!("CARGO_PKG_VERSION"),
        event = "worker_starting",
        "Starting MailCode dispatcher"
    );

    let pool = bootstrap::build(&config).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(pool.run(shutdown_rx));

    shutdown_signal().await;
    info!(event = "shutdown_requested", "Received shutdown signal");
    // The pool also stops when the sender is dropped
    let _ = shutdown_tx.send(true);

    let totals = handle.await.context("Worker pool task failed")?;
    info!(
        delivered = totals.delivered,
        rejected = totals.rejected,
        abandoned = totals.abandoned,
        total = totals.total(),
        event = "worker_stopped",
        "MailCode dispatcher stopped"
    );

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
