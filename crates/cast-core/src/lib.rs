//! # cast-core
//!
//! Shared library for DeskCast containing the stream framing codec, the
//! command channel wire model, coordinate mapping, and the viewer-to-native
//! key code translation table.
//!
//! This crate is used by both the host and viewer applications.
//! It has zero dependencies on OS APIs, UI frameworks, or network sockets.
//!
//! # Architecture overview
//!
//! DeskCast mirrors one machine's display to another and sends the remote
//! user's input back.  The *host* captures still images of its display,
//! JPEG-encodes them, and pushes them down a TCP byte stream; the *viewer*
//! renders the frames and forwards pointer/keyboard events to the host,
//! which injects them into the local input subsystem.
//!
//! This crate (`cast-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – How bytes travel over the network.  The stream channel
//!   carries length-prefixed opaque frames; the command channel carries
//!   newline-delimited JSON input commands.  Both codecs tolerate arbitrary
//!   TCP chunk boundaries.
//!
//! - **`domain`** – Pure logic with no OS dependencies: pixel dimensions and
//!   the viewport-to-capture-space coordinate mapping.
//!
//! - **`keymap`** – The static translation table that converts the viewer's
//!   key codes into the host's native virtual key codes.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `cast_core::InputCommand` instead of `cast_core::protocol::commands::InputCommand`.
pub use domain::geometry::{viewport_to_source, PixelSize};
pub use keymap::viewer_to_native;
pub use protocol::commands::{
    parse_line, CommandParseError, InputCommand, LineAssembler, MouseSide,
};
pub use protocol::framing::{encode_frame, FrameAssembler, FramingError};
