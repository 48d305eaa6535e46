//! Platform input injection implementations.
//!
//! Production builds select an OS-specific implementation (CoreGraphics
//! event taps on macOS); the mock records events for tests and headless
//! runs.

pub mod mock;
