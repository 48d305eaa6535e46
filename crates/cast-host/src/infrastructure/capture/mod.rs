//! Capture and encode capability implementations.
//!
//! Production builds plug in an OS capture backend (CGWindowList /
//! ScreenCaptureKit on macOS) and a real JPEG encoder; the mocks here
//! generate deterministic synthetic frames for tests and headless runs.

pub mod mock;
