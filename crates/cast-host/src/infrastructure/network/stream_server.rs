//! Stream endpoint: pushes framed frames to the connected viewer.
//!
//! Endpoint state machine: `WaitingForPeer → Streaming → WaitingForPeer`.
//! On accept, the session starts a periodic capture tick; each tick runs
//! capture → encode → frame → send strictly in sequence on the session
//! task.  Capture or encode failure skips the tick; a write failure ends
//! the session and the endpoint waits for the next peer.
//!
//! # Tick overlap policy
//!
//! The tick timer uses `MissedTickBehavior::Skip`: when one tick's pipeline
//! (typically a slow send on a congested link) runs past the next deadline,
//! the overdue ticks are dropped rather than queued.  At most one frame is
//! ever in flight, and a stalled peer receives fresher frames once it
//! drains instead of a backlog of stale ones.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use cast_core::encode_frame;

use crate::application::produce_frames::ProduceFrameUseCase;
use crate::infrastructure::network::ConnectionListener;

/// Tick cadence for a 30 fps target.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// The stream endpoint.
pub struct StreamServer {
    addr: SocketAddr,
    pipeline: Arc<ProduceFrameUseCase>,
    frame_interval: Duration,
}

impl StreamServer {
    pub fn new(
        addr: SocketAddr,
        pipeline: Arc<ProduceFrameUseCase>,
        frame_interval: Duration,
    ) -> Self {
        Self {
            addr,
            pipeline,
            frame_interval,
        }
    }

    /// Runs the endpoint forever: bind, accept one viewer at a time, stream
    /// until the session's first write failure, repeat.
    pub async fn run(self) {
        let pipeline = self.pipeline;
        let frame_interval = self.frame_interval;
        ConnectionListener::new("stream", self.addr)
            .run(move |stream, peer| {
                let pipeline = Arc::clone(&pipeline);
                tokio::spawn(run_stream_session(stream, peer, pipeline, frame_interval))
            })
            .await;
    }
}

/// Drives one streaming session until the peer goes away.
///
/// Public so integration tests can run a session against a socket they
/// accepted themselves.
pub async fn run_stream_session(
    mut stream: TcpStream,
    peer: SocketAddr,
    pipeline: Arc<ProduceFrameUseCase>,
    frame_interval: Duration,
) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!("could not set TCP_NODELAY for {peer}: {e}");
    }

    let mut ticker = interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("streaming to {peer} every {frame_interval:?}");

    loop {
        ticker.tick().await;

        // Capture and encode failures are per-tick: log and wait for the
        // next tick with the session intact.
        let payload = match pipeline.next_frame() {
            Ok(payload) => payload,
            Err(e) => {
                warn!("skipping tick: {e}");
                continue;
            }
        };

        if let Err(e) = stream.write_all(&encode_frame(&payload)).await {
            info!("stream session for {peer} ended: {e}");
            break;
        }
    }
    // Dropping the stream closes the socket; the endpoint is already back
    // in WaitingForPeer on its accept loop.
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::capture::mock::{MockFrameSource, PassthroughEncoder};
    use cast_core::FrameAssembler;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    fn make_pipeline() -> Arc<ProduceFrameUseCase> {
        Arc::new(ProduceFrameUseCase::new(
            Arc::new(MockFrameSource::new(16, 9)),
            Arc::new(PassthroughEncoder::new()),
            0.6,
        ))
    }

    /// Accepts one connection and runs a session on it, returning the
    /// viewer-side socket.
    async fn start_session(pipeline: Arc<ProduceFrameUseCase>) -> (TcpStream, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let viewer = TcpStream::connect(addr).await.unwrap();
        let (host_side, peer) = listener.accept().await.unwrap();
        let task = tokio::spawn(run_stream_session(
            host_side,
            peer,
            pipeline,
            Duration::from_millis(5),
        ));
        (viewer, task)
    }

    #[tokio::test]
    async fn test_session_streams_decodable_frames() {
        // Arrange
        let (mut viewer, task) = start_session(make_pipeline()).await;

        // Act: read until two whole frames arrive.
        let mut asm = FrameAssembler::new();
        let mut frames = Vec::new();
        let mut chunk = [0u8; 4096];
        timeout(Duration::from_secs(5), async {
            while frames.len() < 2 {
                let n = viewer.read(&mut chunk).await.unwrap();
                assert!(n > 0, "host must not close while viewer is healthy");
                asm.push(&chunk[..n]);
                while let Some(frame) = asm.next_frame().unwrap() {
                    frames.push(frame);
                }
            }
        })
        .await
        .expect("frames must arrive");

        // Assert: payloads carry the mock encoder's JPEG-style prefix and
        // differ per tick (the source numbers its frames).
        assert_eq!(&frames[0][..2], &[0xFF, 0xD8]);
        assert_ne!(frames[0], frames[1]);

        task.abort();
    }

    #[tokio::test]
    async fn test_write_failure_ends_the_session() {
        // Arrange
        let (viewer, task) = start_session(make_pipeline()).await;

        // Act: the viewer vanishes.
        drop(viewer);

        // Assert: the session task completes on its own once a write fails.
        timeout(Duration::from_secs(10), task)
            .await
            .expect("session must end after peer disappears")
            .expect("session task must not panic");
    }

    #[tokio::test]
    async fn test_capture_failure_skips_ticks_but_keeps_session() {
        // Arrange: a pipeline whose capture always fails.
        let source = Arc::new(MockFrameSource::new(4, 4));
        source.fail.store(true, std::sync::atomic::Ordering::Relaxed);
        let pipeline = Arc::new(ProduceFrameUseCase::new(
            source.clone(),
            Arc::new(PassthroughEncoder::new()),
            0.6,
        ));
        let (mut viewer, task) = start_session(pipeline).await;

        // Let several ticks elapse while capture is failing.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!task.is_finished(), "failed ticks must not end the session");

        // Act: capture recovers; a frame now arrives on the same session.
        source.fail.store(false, std::sync::atomic::Ordering::Relaxed);
        let mut asm = FrameAssembler::new();
        let mut chunk = [0u8; 4096];
        let frame = timeout(Duration::from_secs(5), async {
            loop {
                let n = viewer.read(&mut chunk).await.unwrap();
                asm.push(&chunk[..n]);
                if let Some(frame) = asm.next_frame().unwrap() {
                    return frame;
                }
            }
        })
        .await
        .expect("frame must arrive after capture recovers");

        assert_eq!(&frame[..2], &[0xFF, 0xD8]);
        task.abort();
    }

    #[test]
    fn test_default_frame_interval_targets_thirty_fps() {
        assert_eq!(DEFAULT_FRAME_INTERVAL, Duration::from_millis(33));
    }
}
