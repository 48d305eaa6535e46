//! Length-prefixed framing codec for the stream channel.
//!
//! Wire format:
//! ```text
//! [payload_len:4][payload:N]
//! ```
//! The length prefix is a big-endian `u32` equal to the exact byte count of
//! the payload.  The payload is opaque to this layer (JPEG by convention).
//!
//! A receiver must never interpret payload bytes until `4 + payload_len`
//! bytes are buffered, so decoding is driven by an accumulating
//! [`FrameAssembler`] that tolerates arbitrary TCP chunk boundaries,
//! including a length prefix split across two reads.

use thiserror::Error;

/// Size of the big-endian length prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default upper bound for a single frame's declared payload length.
///
/// A corrupted length prefix could otherwise request an unbounded
/// allocation; 64 MiB comfortably exceeds any realistic JPEG of a single
/// display.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

/// Errors that can occur while decoding framed data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// The length prefix declares a payload larger than the configured cap.
    #[error("declared frame length {declared} exceeds maximum {max}")]
    FrameTooLarge { declared: usize, max: usize },
}

/// Encodes `payload` into its wire form: 4-byte big-endian length + payload.
///
/// # Examples
///
/// ```rust
/// use cast_core::protocol::framing::encode_frame;
///
/// let bytes = encode_frame(b"Hello");
/// assert_eq!(bytes, [0x00, 0x00, 0x00, 0x05, b'H', b'e', b'l', b'l', b'o']);
/// ```
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Attempts to split one frame off the front of `buf`.
///
/// Returns `Ok(Some((payload, consumed)))` when a complete frame is
/// available, `Ok(None)` when more bytes are needed (the buffer is left
/// untouched either way — the caller advances by `consumed`).
///
/// # Errors
///
/// Returns [`FramingError::FrameTooLarge`] when the declared length exceeds
/// `max_frame_bytes`.
pub fn split_frame(
    buf: &[u8],
    max_frame_bytes: usize,
) -> Result<Option<(&[u8], usize)>, FramingError> {
    if buf.len() < LENGTH_PREFIX_SIZE {
        return Ok(None);
    }
    let declared = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    if declared > max_frame_bytes {
        return Err(FramingError::FrameTooLarge {
            declared,
            max: max_frame_bytes,
        });
    }
    let total = LENGTH_PREFIX_SIZE + declared;
    if buf.len() < total {
        return Ok(None);
    }
    Ok(Some((&buf[LENGTH_PREFIX_SIZE..total], total)))
}

/// Incremental decoder over an accumulating byte buffer.
///
/// Feed raw socket chunks with [`push`](FrameAssembler::push) and drain
/// complete payloads with [`next_frame`](FrameAssembler::next_frame).
/// Chunk boundaries are irrelevant: a payload or even the 4-byte header may
/// arrive split across any number of reads.
#[derive(Debug)]
pub struct FrameAssembler {
    buf: Vec<u8>,
    max_frame_bytes: usize,
}

impl FrameAssembler {
    /// Creates an assembler with the default frame size cap.
    pub fn new() -> Self {
        Self::with_max_frame(DEFAULT_MAX_FRAME_BYTES)
    }

    /// Creates an assembler with a custom frame size cap.
    pub fn with_max_frame(max_frame_bytes: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_frame_bytes,
        }
    }

    /// Appends a raw chunk to the internal buffer.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Drains the next complete frame, if one is buffered.
    ///
    /// Call in a loop until it returns `Ok(None)`: a single chunk may
    /// complete several back-to-back frames.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::FrameTooLarge`] when the buffered length
    /// prefix exceeds the cap.  The buffer is left as-is; callers should
    /// [`clear`](FrameAssembler::clear) and drop the connection, since a
    /// corrupt prefix means framing sync is lost.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, FramingError> {
        match split_frame(&self.buf, self.max_frame_bytes)? {
            Some((payload, consumed)) => {
                let frame = payload.to_vec();
                self.buf.drain(..consumed);
                Ok(Some(frame))
            }
            None => Ok(None),
        }
    }

    /// Number of bytes currently buffered (including any partial frame).
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Discards all buffered bytes.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
