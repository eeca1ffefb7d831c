//! Talkback loopback tester
//!
//! Drives the voice-path loopback engine against a simulated modem speech
//! link and telephony bus. A scenario task plays the modem and the call
//! server: it scripts calls going active, streams downlink audio, and tears
//! the calls down again, while the engine loops every downlink frame back to
//! the uplink for as long as the call is active and the link is in full
//! duplex.

mod scenario;

use clap::Parser;
use talk_loop::run_loopback;
use talk_sim::{SimBus, SimBusConfig, SimLink, SimLinkConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Voice-path loopback tester for a simulated modem speech link
#[derive(Debug, Parser)]
#[command(name = "talkback", version, about)]
struct Cli {
    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of calls to script
    #[arg(long, default_value_t = 1)]
    calls: u32,

    /// Downlink frames per call
    #[arg(long, default_value_t = 5)]
    frames: u32,

    /// Payload bytes per downlink frame
    #[arg(long, default_value_t = 160)]
    frame_bytes: usize,
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "talkback=info,talk_loop=info,talk_sim=info",
        1 => "talkback=debug,talk_loop=debug,talk_sim=debug",
        _ => "talkback=trace,talk_loop=trace,talk_sim=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// First interrupt requests a clean shutdown, the second forces the exit
fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::info!("shutdown requested");
        shutdown.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("second interrupt, forcing exit");
            std::process::exit(1);
        }
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());

    let (link, link_ctl) = SimLink::open(SimLinkConfig {
        downlink_capacity: cli.frame_bytes,
        uplink_capacity: cli.frame_bytes,
    })?;
    let (bus, bus_ctl) = SimBus::open(SimBusConfig::default())?;

    let script = scenario::Scenario {
        calls: cli.calls,
        frames_per_call: cli.frames,
        frame_bytes: cli.frame_bytes,
    };
    tokio::spawn(scenario::drive(script, link_ctl, bus_ctl, shutdown.clone()));

    let stats = run_loopback(link, bus, shutdown).await?;
    tracing::info!(
        "completed: {} frames ({} bytes) looped, {} invalid events, {} bus parse errors",
        stats.frames_looped,
        stats.bytes_looped,
        stats.invalid_transitions,
        stats.bus_parse_errors,
    );
    Ok(())
}
