//! vaas-agent - VaaS Registration Agent
//!
//! Composition root: registers this host's endpoint as a backend under the
//! configured director, then deregisters it once a termination signal
//! arrives.

use tracing_subscriber::fmt::format::FmtSpan;
use vaas_agent::{load_config, shutdown, Client, Registrar};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting vaas-agent host={} director={} backend={}:{}",
        cfg.host,
        cfg.director,
        cfg.address,
        cfg.port
    );

    let client = Client::new(cfg.host.clone(), cfg.username.clone(), cfg.api_key.clone());
    let registrar = Registrar::new(client, cfg);

    let location = registrar.register().await?;
    tracing::info!("fleet membership established at {}", location);

    shutdown::wait_for_signal().await;

    registrar.deregister().await?;
    tracing::info!("vaas-agent stopped");

    Ok(())
}
