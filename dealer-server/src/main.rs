//! Dealer Server
//!
//! Serves the dealer API until interrupted.

use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use dealer::{DealerServer, ServerConfig, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Dealer Server v{}", VERSION);

    let config = ServerConfig::from_env()?;
    info!("Max deck copies: {}", config.max_deck_copies);

    let server = Arc::new(DealerServer::new(config));

    let signal_server = server.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        signal_server.shutdown();
    });

    server.run().await?;
    info!("Dealer server stopped");
    Ok(())
}
