use anyhow::Result;
use confab_core::config::ServiceConfig;
use confab_core::http::HttpServer;
use confab_core::scheduler::RetentionScheduler;
use confab_core::services::retention::RetentionPolicy;
use confab_core::AppCore;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,confab_core=debug".into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Confab server");

    let config = ServiceConfig::from_env()?;
    let core = Arc::new(AppCore::new(&config).await?);

    let policy = Arc::new(RetentionPolicy::new(
        core.storage.clone(),
        config.retention.max_records,
    ));
    let mut scheduler = RetentionScheduler::new(policy, &config.retention.schedule).await?;
    scheduler.start().await?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    let server = HttpServer::new(config.http.clone(), core);
    server.run(shutdown_rx).await?;

    scheduler.shutdown().await?;
    tracing::info!("Confab server stopped");
    Ok(())
}
