//! Coordinate mapping between the viewer's viewport and the capture source.
//!
//! The viewer renders the host's display scaled into a local viewport, so a
//! pointer position on the viewer must be scaled back into the capture
//! source's pixel space before it is sent over the wire:
//!
//! ```text
//! source_coord = local_coord * (capture_dim / viewport_dim)
//! ```
//!
//! The mapping is purely proportional — the viewer is expected to keep the
//! viewport at the capture aspect ratio, so no letterbox offset is applied.

/// Pixel dimensions of a display surface (capture source or viewport).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width-over-height ratio, used by consumers to lock window aspect.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }
}

/// Maps a viewport-local point into the capture source's pixel space.
///
/// Returns `(0.0, 0.0)` when the viewport has a zero dimension, which can
/// happen transiently while a window is being created or minimised.
///
/// # Examples
///
/// ```rust
/// use cast_core::domain::geometry::{viewport_to_source, PixelSize};
///
/// let capture = PixelSize::new(2560, 1440);
/// let viewport = PixelSize::new(1280, 720);
/// assert_eq!(viewport_to_source(640.0, 360.0, viewport, capture), (1280.0, 720.0));
/// ```
pub fn viewport_to_source(
    local_x: f64,
    local_y: f64,
    viewport: PixelSize,
    capture: PixelSize,
) -> (f64, f64) {
    if viewport.width == 0 || viewport.height == 0 {
        return (0.0, 0.0);
    }
    let scale_x = f64::from(capture.width) / f64::from(viewport.width);
    let scale_y = f64::from(capture.height) / f64::from(viewport.height);
    (local_x * scale_x, local_y * scale_y)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
