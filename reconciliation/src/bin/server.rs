//! Reconciliation service binary

use approval_core::InMemoryDirectory;
use ledger_gateway::HttpLedgerGateway;
use reconciliation::{Config, InMemoryStore, ReconciliationService};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting TradeGate reconciliation service");

    // Load configuration: file when given, environment otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    info!(
        service = %config.service_name,
        ledger = %config.gateway.base_url,
        "configuration loaded"
    );

    let gateway = Arc::new(HttpLedgerGateway::new(&config.gateway)?);
    let store = Arc::new(InMemoryStore::new());
    let directory = Arc::new(InMemoryDirectory::new());
    let _service = ReconciliationService::new(config, gateway, store, directory);

    info!("Reconciliation service initialized");

    // TODO: mount the HTTP API once the route layer lands
    tokio::signal::ctrl_c().await?;

    info!("Shutting down reconciliation service");
    Ok(())
}
