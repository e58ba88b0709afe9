//! # minibridged — minibridge daemon
//!
//! Composition root that wires all adapters together and starts the bridge.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize `tracing` from the configured filter
//! - Build the capability bus, the controller link and one accessory per
//!   configured device
//! - Feed every controller line into the bridge on a background task
//! - Ask the controller for fresh values once at startup
//! - Serve the hub-facing HTTP API until SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use minibridge_adapter_http_axum::state::AppState;
use minibridge_adapter_tcp::{ChannelSender, TcpTransport};
use minibridge_adapter_virtual::{VirtualController, forward_replies};
use minibridge_app::event_bus::InProcessCapabilityBus;
use minibridge_app::ports::{CapabilitySink, CommandSender};
use minibridge_app::services::bridge_service::Bridge;

use crate::config::{Config, ControllerMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let bus = Arc::new(InProcessCapabilityBus::new(256));

    match config.controller.mode {
        ControllerMode::Virtual => {
            tracing::info!("using the virtual controller");
            let (controller, replies) = VirtualController::channel();
            let bridge = Arc::new(Bridge::from_configs(
                &config.accessories,
                Arc::clone(&bus),
                Arc::new(controller),
            )?);

            let feeder = Arc::clone(&bridge);
            tokio::spawn(async move {
                forward_replies(replies, |line| {
                    feeder.handle_line(line);
                })
                .await;
            });

            serve(&config, bridge, bus).await
        }
        ControllerMode::Tcp => {
            let (sender, outbound) = ChannelSender::channel();
            let bridge = Arc::new(Bridge::from_configs(
                &config.accessories,
                Arc::clone(&bus),
                sender,
            )?);

            let feeder = Arc::clone(&bridge);
            let tcp = config.controller.tcp.clone();
            tokio::spawn(async move {
                let result = TcpTransport::run(&tcp, outbound, |line| {
                    feeder.handle_line(line);
                })
                .await;
                match result {
                    Ok(()) => tracing::warn!("controller link closed"),
                    Err(err) => tracing::error!(error = %err, "controller link failed"),
                }
            });

            serve(&config, bridge, bus).await
        }
    }
}

async fn serve<S, C>(
    config: &Config,
    bridge: Arc<Bridge<S, C>>,
    bus: Arc<InProcessCapabilityBus>,
) -> anyhow::Result<()>
where
    S: CapabilitySink + 'static,
    C: CommandSender + 'static,
{
    bridge.refresh_all();

    let app = minibridge_adapter_http_axum::router::build(AppState::new(bridge, bus));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, "minibridged listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("minibridged stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown requested");
}
