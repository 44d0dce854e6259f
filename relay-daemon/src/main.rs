//! Relay Volume Daemon
//!
//! Watches an ALSA volume control on the DAC and mirrors it onto a relay
//! attenuator over I2C, while holding a second control at full scale.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use relay_bridge::{run_bridge, VolumeBridge};
use relay_hw::{find_card, open_relay, AlsaMixer};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Include all our crates in the default filter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "relay_volume=info,relay_protocol=info,relay_bridge=info,relay_hw=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("Starting relay volume bridge");

    let card = find_card(&args.card)?;
    let input = AlsaMixer::open(&card, &args.input_control)
        .with_context(|| format!("could not open input control {}", args.input_control))?;
    let relay = open_relay(&args.i2c_bus, args.address)?;

    let mut bridge = VolumeBridge::with_config(args.bridge_config(), input, relay);
    if let Some(name) = args.output_control() {
        let output = AlsaMixer::open(&card, name)
            .with_context(|| format!("could not open output control {}", name))?;
        bridge = bridge.with_output(output);
    }

    run_bridge(bridge, shutdown_signal()).await;
    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
