//! Mock frame source and encoder for tests and headless runs.
//!
//! `MockFrameSource` produces a fixed-size synthetic image whose first
//! bytes carry a frame counter, so consumers can tell successive frames
//! apart.  `PassthroughEncoder` emits a small deterministic payload with a
//! JPEG-like prefix instead of running a real compressor.  Both expose a
//! `fail` switch to exercise the skip-tick error paths.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::application::produce_frames::{FrameEncoder, FrameError, FrameSource, RawImage};

/// Synthetic capture backend producing numbered frames.
pub struct MockFrameSource {
    width: u32,
    height: u32,
    counter: AtomicU64,
    /// When `true`, `capture_still` fails until cleared.
    pub fail: AtomicBool,
}

impl MockFrameSource {
    /// A source producing frames at the given synthetic resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            counter: AtomicU64::new(0),
            fail: AtomicBool::new(false),
        }
    }

    /// 1080p default, matching the most common capture target.
    pub fn full_hd() -> Self {
        Self::new(1920, 1080)
    }

    /// Number of successful captures so far.
    pub fn captures(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl FrameSource for MockFrameSource {
    fn capture_still(&self) -> Result<RawImage, FrameError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(FrameError::Capture("mock capture disabled".to_string()));
        }
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        // Eight counter bytes followed by a fixed fill; enough for tests to
        // distinguish frames without allocating a full pixel buffer.
        let mut data = n.to_be_bytes().to_vec();
        data.resize(64, 0x5A);
        Ok(RawImage {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

/// Encoder stand-in that wraps the raw data behind a JPEG-style marker.
#[derive(Default)]
pub struct PassthroughEncoder {
    /// When `true`, `encode` fails until cleared.
    pub fail: AtomicBool,
}

impl PassthroughEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameEncoder for PassthroughEncoder {
    fn encode(&self, image: &RawImage, quality: f32) -> Result<Vec<u8>, FrameError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(FrameError::Encode("mock encoder disabled".to_string()));
        }
        // SOI marker + quantised quality byte + the source bytes verbatim.
        let mut out = vec![0xFF, 0xD8, (quality.clamp(0.0, 1.0) * 100.0) as u8];
        out.extend_from_slice(&image.data);
        Ok(out)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
