//! Key code translation for cross-platform keyboard forwarding.
//!
//! The viewer reports keys using its own key code space (Windows/DOM
//! `keyCode` values); the host injects events using its native virtual key
//! codes.  Translation is a static table lookup at the capture boundary —
//! keys with no native equivalent are dropped by the viewer and never reach
//! the wire.

pub mod viewer_vk;

pub use viewer_vk::viewer_to_native;
