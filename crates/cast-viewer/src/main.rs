//! DeskCast viewer application entry point.
//!
//! Wires together the connection manager and the render-side frame channel,
//! then parks on Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ ViewerTarget::parse(argv[1])   -- bare host or deskcast:// URL
//!  └─ ChannelFrameSink               -- read loop → bounded channel
//!  └─ consumer task                  -- decode/render seam (logs frames)
//!  └─ ViewerConnectionManager        -- dials both channels, owns the pair
//!  └─ ctrl_c().await
//! ```
//!
//! The consumer task here stands in for the embedding UI shell: a real
//! deployment decodes each payload and draws it, and feeds
//! [`LocalEvent`](cast_viewer::application::capture_input::LocalEvent)s
//! from its window system into `ViewerInputCapture` and
//! `send_commands`.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cast_viewer::application::reassemble_frames::SharedDimensions;
use cast_viewer::infrastructure::network::{ViewerConnectionManager, ViewerTarget};
use cast_viewer::infrastructure::render::ChannelFrameSink;

/// Frames buffered between the socket reader and the renderer.
const RENDER_QUEUE_DEPTH: usize = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Target host from the command line; a protocol-handler invocation
    // passes the deskcast:// URL through the same argument.
    let target_arg = std::env::args().nth(1).unwrap_or_else(|| "127.0.0.1".to_string());
    let target = ViewerTarget::parse(&target_arg)
        .with_context(|| format!("parsing target address {target_arg:?}"))?;

    info!("DeskCast viewer starting, target {}", target.host);

    let dims = SharedDimensions::new();
    let (sink, mut frames) = ChannelFrameSink::new(RENDER_QUEUE_DEPTH);

    // ── Render seam ───────────────────────────────────────────────────────────
    // In production: decode each payload and draw it into the window.
    let render_dims = dims.clone();
    let render_task = tokio::spawn(async move {
        let mut rendered: u64 = 0;
        while let Some(frame) = frames.recv().await {
            rendered += 1;
            if rendered % 30 == 1 {
                match render_dims.get() {
                    Some(size) => info!(
                        "frame #{rendered}: {} bytes at {}x{}",
                        frame.len(),
                        size.width,
                        size.height
                    ),
                    None => info!("frame #{rendered}: {} bytes", frame.len()),
                }
            }
        }
    });

    let mut manager = ViewerConnectionManager::new(Arc::new(sink), dims);
    if let Err(e) = manager.connect_to(&target).await {
        // The host may simply not be up yet; stay alive so a protocol
        // handler or the user can re-home later.
        warn!("initial connection failed: {e}");
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutdown signal received");

    manager.disconnect().await;
    render_task.abort();

    info!("DeskCast viewer stopped");
    Ok(())
}
