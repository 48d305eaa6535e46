//! Pure domain logic with no OS or socket dependencies.

pub mod geometry;

pub use geometry::{viewport_to_source, PixelSize};
