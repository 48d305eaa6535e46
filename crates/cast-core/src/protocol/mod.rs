//! Protocol module containing the two channel codecs.
//!
//! The stream channel (host → viewer) carries length-prefixed opaque frames;
//! the command channel (viewer → host) carries newline-delimited JSON.

pub mod commands;
pub mod framing;

pub use commands::{parse_line, CommandParseError, InputCommand, LineAssembler, MouseSide};
pub use framing::{encode_frame, FrameAssembler, FramingError};
