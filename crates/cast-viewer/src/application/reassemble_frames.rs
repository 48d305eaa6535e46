//! FrameReassembler: client-side counterpart of the stream framing codec.
//!
//! Socket chunks go in; complete frame payloads come out and are handed to
//! a [`FrameSink`].  The sink is async so the read loop can keep draining
//! buffered frames while a slow decode or render is still in progress on
//! the consumer side.
//!
//! # Aspect lock
//!
//! The first payload that yields JPEG dimensions publishes them once
//! through [`SharedDimensions`], so the embedding window can lock its
//! aspect ratio and the input capture can scale coordinates.  The policy is
//! deliberately first-frame-only: the host's capture resolution does not
//! change within a session, and a fresh reassembler (hence a fresh lock) is
//! created per connection.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::info;

use cast_core::{FrameAssembler, FramingError, PixelSize};

/// Async consumer seam for decoded frame payloads.
///
/// Implementations must not block the caller longer than a channel send;
/// decode/render work belongs on the consumer's own task.
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// Accepts one complete frame payload.
    async fn submit(&self, frame: Vec<u8>);
}

/// Capture dimensions shared between the reassembler (writer) and the
/// input capture (reader).
#[derive(Clone, Default)]
pub struct SharedDimensions(Arc<RwLock<Option<PixelSize>>>);

impl SharedDimensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes newly observed capture dimensions.
    pub fn set(&self, size: PixelSize) {
        *self.0.write().expect("dimensions lock poisoned") = Some(size);
    }

    /// Most recently observed capture dimensions, if any frame has yielded
    /// them yet.
    pub fn get(&self) -> Option<PixelSize> {
        *self.0.read().expect("dimensions lock poisoned")
    }
}

/// Reassembles the stream channel's byte flow into frame payloads.
pub struct FrameReassembler {
    assembler: FrameAssembler,
    dims: SharedDimensions,
    aspect_locked: bool,
}

impl FrameReassembler {
    /// Creates a reassembler with the default frame size cap.
    pub fn new(dims: SharedDimensions) -> Self {
        Self {
            assembler: FrameAssembler::new(),
            dims,
            aspect_locked: false,
        }
    }

    /// Creates a reassembler with a custom frame size cap.
    pub fn with_max_frame(dims: SharedDimensions, max_frame_bytes: usize) -> Self {
        Self {
            assembler: FrameAssembler::with_max_frame(max_frame_bytes),
            dims,
            aspect_locked: false,
        }
    }

    /// Feeds one socket chunk and forwards every completed frame to `sink`.
    ///
    /// Returns the number of frames completed by this chunk.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError`] when the buffered length prefix is corrupt;
    /// the internal buffer is cleared because framing sync is lost, and the
    /// caller should drop the connection.
    pub async fn ingest(
        &mut self,
        chunk: &[u8],
        sink: &dyn FrameSink,
    ) -> Result<usize, FramingError> {
        self.assembler.push(chunk);

        let mut completed = 0;
        loop {
            match self.assembler.next_frame() {
                Ok(Some(frame)) => {
                    if !self.aspect_locked {
                        if let Some(size) = jpeg_dimensions(&frame) {
                            info!(
                                "capture is {}x{}, locking aspect ratio {:.4}",
                                size.width,
                                size.height,
                                size.aspect_ratio()
                            );
                            self.dims.set(size);
                            self.aspect_locked = true;
                        }
                    }
                    sink.submit(frame).await;
                    completed += 1;
                }
                Ok(None) => return Ok(completed),
                Err(e) => {
                    self.assembler.clear();
                    return Err(e);
                }
            }
        }
    }
}

/// Extracts pixel dimensions from a JPEG payload by scanning for the first
/// start-of-frame marker.
///
/// Returns `None` for payloads that are not JPEG or whose SOF segment is
/// missing/truncated — the caller simply keeps rendering without an aspect
/// lock.
pub fn jpeg_dimensions(payload: &[u8]) -> Option<PixelSize> {
    // SOI marker first, or this is not a JPEG.
    if payload.len() < 4 || payload[0] != 0xFF || payload[1] != 0xD8 {
        return None;
    }

    let mut i = 2;
    while i + 3 < payload.len() {
        if payload[i] != 0xFF {
            // Marker sync lost.
            return None;
        }
        let marker = payload[i + 1];

        // Fill bytes before a marker are legal.
        if marker == 0xFF {
            i += 1;
            continue;
        }

        match marker {
            // Standalone markers carry no length field.
            0x01 | 0xD0..=0xD7 => i += 2,
            // SOF0–SOF15 except the non-frame members of the range
            // (DHT=0xC4, JPG=0xC8, DAC=0xCC).  Segment layout:
            // [len:2][precision:1][height:2][width:2]…
            0xC0..=0xCF if marker != 0xC4 && marker != 0xC8 && marker != 0xCC => {
                if i + 9 > payload.len() {
                    return None;
                }
                let height = u16::from_be_bytes([payload[i + 5], payload[i + 6]]);
                let width = u16::from_be_bytes([payload[i + 7], payload[i + 8]]);
                return Some(PixelSize::new(u32::from(width), u32::from(height)));
            }
            // Entropy-coded data follows start-of-scan; no SOF was seen.
            0xDA => return None,
            // Any other segment: skip its declared length.
            _ => {
                let len =
                    u16::from_be_bytes([payload[i + 2], payload[i + 3]]) as usize;
                if len < 2 {
                    return None;
                }
                i += 2 + len;
            }
        }
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
