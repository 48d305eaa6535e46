//! Render-side [`FrameSink`] implementations.
//!
//! The socket read loop must never wait on image decode or drawing, so the
//! production sink is a bounded channel: the read loop pushes payloads, a
//! separate consumer task decodes and renders them.  Tests use the
//! recording sink.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::application::reassemble_frames::FrameSink;

/// Forwards frames into a bounded channel consumed by the render task.
///
/// When the channel is full the oldest frames are effectively behind the
/// renderer already; `submit` waits for space rather than dropping, which
/// pushes backpressure into TCP where the host's skip-tick policy absorbs
/// it.
pub struct ChannelFrameSink {
    tx: mpsc::Sender<Vec<u8>>,
}

impl ChannelFrameSink {
    /// Creates the sink plus the receiver for the render/decode task.
    pub fn new(depth: usize) -> (Self, mpsc::Receiver<Vec<u8>>) {
        let (tx, rx) = mpsc::channel(depth);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl FrameSink for ChannelFrameSink {
    async fn submit(&self, frame: Vec<u8>) {
        if self.tx.send(frame).await.is_err() {
            // Renderer is gone (window closed); frames are simply dropped
            // until the connection is torn down.
            debug!("render channel closed, dropping frame");
        }
    }
}

/// Records submitted frames in memory for test assertions.
#[derive(Default)]
pub struct RecordingFrameSink {
    frames: Mutex<Vec<Vec<u8>>>,
}

impl RecordingFrameSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all frames received so far, in arrival order.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames.lock().expect("sink mutex poisoned").clone()
    }

    /// Number of frames received so far.
    pub fn len(&self) -> usize {
        self.frames.lock().expect("sink mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FrameSink for RecordingFrameSink {
    async fn submit(&self, frame: Vec<u8>) {
        self.frames.lock().expect("sink mutex poisoned").push(frame);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
