//! cast-viewer library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does cast-viewer do?
//!
//! The *viewer* is the controlling side of a DeskCast pairing.  It:
//!
//! 1. Connects two TCP sockets to the host: the frame stream (default port
//!    5051) and the command channel (default port 5050).
//! 2. Reassembles length-prefixed JPEG frames from arbitrary TCP chunks and
//!    hands each payload to an asynchronous render sink, so a slow decode
//!    never stalls socket draining.
//! 3. Converts local pointer/keyboard/scroll events into wire commands:
//!    coordinates scale into the capture source's pixel space, key codes
//!    translate through the static table, and pointer moves are
//!    rate-limited to 60 per second.
//! 4. Supports re-homing to a different host address at runtime by tearing
//!    down and rebuilding both sockets, with at most one live pair at any
//!    time.
//!
//! Actual rendering and event sourcing belong to the embedding UI shell;
//! this crate ends at the [`FrameSink`](application::reassemble_frames::FrameSink)
//! and [`LocalEvent`](application::capture_input::LocalEvent) seams.

/// Application layer: frame reassembly and input capture use cases.
pub mod application;

/// Infrastructure layer: sockets and render sink implementations.
pub mod infrastructure;
