//! ProduceFrameUseCase: one capture-tick pipeline from still image to
//! encoded bytes.
//!
//! The use case depends only on the [`FrameSource`] and [`FrameEncoder`]
//! traits; platform implementations live in the infrastructure layer and
//! are injected at construction time, making the pipeline fully
//! unit-testable.  Capture and encode failures are per-tick: the caller
//! logs, skips the tick, and keeps the session alive.

use std::sync::Arc;

use thiserror::Error;

/// Error type for the frame production pipeline.
///
/// The variant records which stage failed; both stages have the same
/// disposition (log, skip tick, session continues).
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("capture failed: {0}")]
    Capture(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// An uncompressed still image as produced by a capture backend.
///
/// The pixel data layout is a contract between the `FrameSource` and the
/// `FrameEncoder` implementation pair; the pipeline treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Produces one still image of the display per call.
pub trait FrameSource: Send + Sync {
    /// Captures the current display contents.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Capture`] when the OS capture call fails
    /// (screen locked, permission revoked, display asleep).
    fn capture_still(&self) -> Result<RawImage, FrameError>;
}

/// Compresses a [`RawImage`] into the wire payload format (JPEG by
/// convention; the format is not negotiated on the wire).
pub trait FrameEncoder: Send + Sync {
    /// Encodes `image` at the given quality factor (0.0–1.0).
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Encode`] when compression fails.
    fn encode(&self, image: &RawImage, quality: f32) -> Result<Vec<u8>, FrameError>;
}

/// The frame production use case: capture, then encode, strictly in
/// sequence on the calling task.
pub struct ProduceFrameUseCase {
    source: Arc<dyn FrameSource>,
    encoder: Arc<dyn FrameEncoder>,
    quality: f32,
}

impl ProduceFrameUseCase {
    /// Creates the pipeline with the given capture/encode pair and JPEG
    /// quality factor.
    pub fn new(source: Arc<dyn FrameSource>, encoder: Arc<dyn FrameEncoder>, quality: f32) -> Self {
        Self {
            source,
            encoder,
            quality,
        }
    }

    /// Runs one tick's pipeline and returns the encoded payload.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] identifying the failed stage; the caller
    /// skips the tick.
    pub fn next_frame(&self) -> Result<Vec<u8>, FrameError> {
        let image = self.source.capture_still()?;
        self.encoder.encode(&image, self.quality)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct StubSource {
        fail: AtomicBool,
        captures: AtomicUsize,
    }

    impl StubSource {
        fn new() -> Self {
            Self {
                fail: AtomicBool::new(false),
                captures: AtomicUsize::new(0),
            }
        }
    }

    impl FrameSource for StubSource {
        fn capture_still(&self) -> Result<RawImage, FrameError> {
            if self.fail.load(Ordering::Relaxed) {
                return Err(FrameError::Capture("display asleep".to_string()));
            }
            self.captures.fetch_add(1, Ordering::Relaxed);
            Ok(RawImage {
                width: 4,
                height: 2,
                data: vec![0x7F; 4 * 2 * 4],
            })
        }
    }

    struct StubEncoder {
        fail: AtomicBool,
        qualities: Mutex<Vec<f32>>,
    }

    impl StubEncoder {
        fn new() -> Self {
            Self {
                fail: AtomicBool::new(false),
                qualities: Mutex::new(Vec::new()),
            }
        }
    }

    impl FrameEncoder for StubEncoder {
        fn encode(&self, image: &RawImage, quality: f32) -> Result<Vec<u8>, FrameError> {
            if self.fail.load(Ordering::Relaxed) {
                return Err(FrameError::Encode("compressor rejected image".to_string()));
            }
            self.qualities.lock().unwrap().push(quality);
            // A recognisable stand-in payload derived from the input.
            Ok(vec![0xFF, 0xD8, image.width as u8, image.height as u8])
        }
    }

    #[test]
    fn test_next_frame_runs_capture_then_encode() {
        // Arrange
        let source = Arc::new(StubSource::new());
        let encoder = Arc::new(StubEncoder::new());
        let uc = ProduceFrameUseCase::new(source.clone(), encoder.clone(), 0.6);

        // Act
        let frame = uc.next_frame().unwrap();

        // Assert
        assert_eq!(frame, vec![0xFF, 0xD8, 4, 2]);
        assert_eq!(source.captures.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_quality_factor_is_passed_through_to_encoder() {
        let encoder = Arc::new(StubEncoder::new());
        let uc = ProduceFrameUseCase::new(Arc::new(StubSource::new()), encoder.clone(), 0.85);

        uc.next_frame().unwrap();

        assert_eq!(*encoder.qualities.lock().unwrap(), vec![0.85]);
    }

    #[test]
    fn test_capture_failure_surfaces_without_calling_encoder() {
        let source = Arc::new(StubSource::new());
        source.fail.store(true, Ordering::Relaxed);
        let encoder = Arc::new(StubEncoder::new());
        let uc = ProduceFrameUseCase::new(source, encoder.clone(), 0.6);

        let result = uc.next_frame();

        assert!(matches!(result, Err(FrameError::Capture(_))));
        assert!(encoder.qualities.lock().unwrap().is_empty());
    }

    #[test]
    fn test_encode_failure_surfaces_as_encode_error() {
        let encoder = Arc::new(StubEncoder::new());
        encoder.fail.store(true, Ordering::Relaxed);
        let uc = ProduceFrameUseCase::new(Arc::new(StubSource::new()), encoder, 0.6);

        assert!(matches!(uc.next_frame(), Err(FrameError::Encode(_))));
    }

    #[test]
    fn test_pipeline_recovers_after_transient_capture_failure() {
        // A failed tick must not poison the next one.
        let source = Arc::new(StubSource::new());
        let uc = ProduceFrameUseCase::new(source.clone(), Arc::new(StubEncoder::new()), 0.6);

        source.fail.store(true, Ordering::Relaxed);
        assert!(uc.next_frame().is_err());

        source.fail.store(false, Ordering::Relaxed);
        assert!(uc.next_frame().is_ok());
    }
}
