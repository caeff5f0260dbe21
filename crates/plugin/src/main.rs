//! TogglDeck plugin process
//!
//! Launched by the Stream Deck host. Connects back to the host, mirrors the
//! running Toggl Track entry onto the configured buttons and exits when the
//! host closes the connection.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use toggldeck_core::{
    EngineOptions, EventDispatcher, ReconciliationEngine, RefreshScheduler, SettingsCatalog,
    SystemClock,
};
use toggldeck_infra::{command_channel, config, logging, HostBridge, TogglClient};
use tracing::{debug, info};

mod cli;

use cli::{normalize_args, Args};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse_from(normalize_args(std::env::args_os()));

    // Before config loading so `.env` can carry TOGGLDECK_* overrides.
    let dotenv = dotenvy::dotenv();

    let config = config::load(args.config.as_deref()).context("failed to load configuration")?;
    let _log_guard = logging::init(&config.logging).context("failed to initialise logging")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) => debug!(error = %err, "No .env loaded"),
    }
    info!(
        version = env!("CARGO_PKG_VERSION"),
        host_version = args.host_version().as_deref().unwrap_or("unknown"),
        port = args.port,
        "TogglDeck starting"
    );

    let service = Arc::new(TogglClient::new(&config.api).context("failed to build Toggl client")?);
    debug!(base_url = service.base_url(), "Toggl client ready");
    let (outlet, commands) = command_channel();
    let outlet = Arc::new(outlet);

    let engine = Arc::new(ReconciliationEngine::new(
        service.clone(),
        outlet.clone(),
        Arc::new(SystemClock),
        EngineOptions::from(&config),
    ));
    let catalog = SettingsCatalog::new(service, outlet);
    let scheduler = RefreshScheduler::new(engine.clone(), config.refresh.tick());
    let dispatcher = EventDispatcher::new(engine, catalog, scheduler);

    let bridge = HostBridge::new(args.port, &args.plugin_uuid, &args.register_event)?;
    info!(url = %bridge.url(), "Connecting to host");
    bridge.run(commands, &dispatcher).await.context("host connection failed")?;

    info!("Host disconnected; exiting");
    Ok(())
}
