//! DeskCast host application entry point.
//!
//! Wires together configuration, the capture/encode pipeline, the input
//! injector, and the two TCP endpoints, then parks on Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()                 -- TOML from the platform config dir
//!  └─ tokio::spawn(StreamServer)    -- accept loop + capture-tick sessions
//!  └─ tokio::spawn(InputServer)     -- accept loop + read-loop sessions
//!  └─ ctrl_c().await                -- both endpoints run until shutdown
//! ```
//!
//! The two pipelines share nothing: a stream-channel failure never affects
//! the command channel and vice versa.  Each endpoint keeps itself alive
//! across bind/accept failures and session deaths for the process lifetime.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cast_host::application::inject_input::ApplyInputUseCase;
use cast_host::application::produce_frames::ProduceFrameUseCase;
use cast_host::infrastructure::capture::mock::{MockFrameSource, PassthroughEncoder};
use cast_host::infrastructure::injection::mock::MockInputInjector;
use cast_host::infrastructure::network::{InputServer, StreamServer};
use cast_host::infrastructure::storage::load_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("loading configuration")?;

    // Structured logging; RUST_LOG overrides the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.host.log_level.clone())),
        )
        .init();

    info!("DeskCast host starting");

    let bind_ip: IpAddr = config
        .network
        .bind_address
        .parse()
        .with_context(|| format!("invalid bind address {:?}", config.network.bind_address))?;
    let stream_addr = SocketAddr::new(bind_ip, config.network.stream_port);
    let command_addr = SocketAddr::new(bind_ip, config.network.command_port);

    let fps = config.stream.target_fps.max(1);
    let frame_interval = Duration::from_millis(1000 / u64::from(fps));

    // ── Capture/encode pipeline ───────────────────────────────────────────────
    // In production: replace the mocks with the OS capture backend and a
    // real JPEG encoder.
    let pipeline = Arc::new(ProduceFrameUseCase::new(
        Arc::new(MockFrameSource::full_hd()),
        Arc::new(PassthroughEncoder::new()),
        config.stream.jpeg_quality,
    ));

    // ── Input injector ────────────────────────────────────────────────────────
    // In production: replace MockInputInjector with the CoreGraphics-backed
    // implementation.
    let apply = Arc::new(ApplyInputUseCase::new(Arc::new(MockInputInjector::new())));

    // ── Endpoints ─────────────────────────────────────────────────────────────
    // Two independent pipelines, each a task for the process lifetime.
    let stream_task = tokio::spawn(
        StreamServer::new(stream_addr, pipeline, frame_interval).run(),
    );
    let input_task = tokio::spawn(InputServer::new(command_addr, apply).run());

    info!(
        "endpoints up: stream on {stream_addr}, commands on {command_addr}, {fps} fps target"
    );

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutdown signal received");

    stream_task.abort();
    input_task.abort();

    info!("DeskCast host stopped");
    Ok(())
}
