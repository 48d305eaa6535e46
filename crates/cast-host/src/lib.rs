//! cast-host library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does cast-host do?
//!
//! The *host* is the machine being viewed and controlled.  It runs two
//! independent TCP endpoints for the process lifetime:
//!
//! 1. The **stream endpoint** (default port 5051) accepts one viewer at a
//!    time and pushes length-prefixed JPEG frames at the configured cadence.
//! 2. The **command endpoint** (default port 5050) accepts one controller at
//!    a time, reassembles newline-delimited JSON command lines, and applies
//!    each decoded command to the local input subsystem in arrival order.
//!
//! Capture, JPEG encoding, and OS input synthesis are external capabilities
//! behind the `FrameSource`, `FrameEncoder`, and `InputInjector` traits;
//! this crate ships recording mocks for tests and headless runs.

/// Application layer: use cases and capability trait seams.
pub mod application;

/// Infrastructure layer: TCP endpoints, capability mocks, and configuration.
pub mod infrastructure;
