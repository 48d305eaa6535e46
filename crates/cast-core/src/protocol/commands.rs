//! Command channel wire model and line parser.
//!
//! The command channel is a sequence of UTF-8 text lines terminated by `\n`
//! (byte `0x0A`).  Each line is one JSON value: either a single command
//! object or an array of command objects applied in array order.
//!
//! Command object shape:
//! ```json
//! {"type": "mouseMove", "x": 100.0, "y": 200.0}
//! {"type": "keyDown", "keyCode": 36}
//! ```
//!
//! Two representations live here:
//!
//! - [`WireCommand`] – mirrors the JSON exactly (tag strings, `keyCode`,
//!   `deltaY` field names).  Serde does all validation: an unrecognised
//!   `type` or a missing required field fails that one object, never the
//!   connection.
//! - [`InputCommand`] – the closed domain variant the rest of the system
//!   works with.  Button direction and side collapse into one variant;
//!   coordinates are `f64` in the capture source's pixel space.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Which physical mouse button a [`InputCommand::MouseButton`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseSide {
    Left,
    Right,
}

/// One decoded user-interaction intent, destined for input injection.
///
/// `x`/`y` are floating-point coordinates in the capture source's pixel
/// space, not the viewer's local pixel space.
#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    /// Pointer motion.  May be injected as a drag when a button is held.
    MouseMove { x: f64, y: f64 },
    /// Pointer motion that must always inject as a drag.
    MouseDrag { x: f64, y: f64 },
    /// Button press or release at a position.
    MouseButton {
        side: MouseSide,
        down: bool,
        x: f64,
        y: f64,
    },
    /// Key press or release, `code` in the host's native key code space.
    KeyEvent { code: u16, down: bool },
    /// Vertical wheel scroll.
    Scroll { delta_y: i32 },
    /// Release all stuck modifier keys on the host.
    ModifierReset,
}

/// JSON wire form of one command object.
///
/// Tag strings and field names match the protocol exactly; this enum exists
/// only at the channel boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WireCommand {
    #[serde(rename = "mouseMove")]
    MouseMove { x: f64, y: f64 },
    #[serde(rename = "mouseDrag")]
    MouseDrag { x: f64, y: f64 },
    #[serde(rename = "mouseDown")]
    MouseDown { x: f64, y: f64 },
    #[serde(rename = "mouseUp")]
    MouseUp { x: f64, y: f64 },
    #[serde(rename = "mouseRightDown")]
    MouseRightDown { x: f64, y: f64 },
    #[serde(rename = "mouseRightUp")]
    MouseRightUp { x: f64, y: f64 },
    #[serde(rename = "keyDown")]
    KeyDown {
        #[serde(rename = "keyCode")]
        key_code: u16,
    },
    #[serde(rename = "keyUp")]
    KeyUp {
        #[serde(rename = "keyCode")]
        key_code: u16,
    },
    #[serde(rename = "mouseScroll")]
    MouseScroll {
        #[serde(rename = "deltaY")]
        delta_y: i32,
    },
    #[serde(rename = "forceModifierReset")]
    ForceModifierReset,
}

impl From<WireCommand> for InputCommand {
    fn from(wire: WireCommand) -> Self {
        match wire {
            WireCommand::MouseMove { x, y } => InputCommand::MouseMove { x, y },
            WireCommand::MouseDrag { x, y } => InputCommand::MouseDrag { x, y },
            WireCommand::MouseDown { x, y } => InputCommand::MouseButton {
                side: MouseSide::Left,
                down: true,
                x,
                y,
            },
            WireCommand::MouseUp { x, y } => InputCommand::MouseButton {
                side: MouseSide::Left,
                down: false,
                x,
                y,
            },
            WireCommand::MouseRightDown { x, y } => InputCommand::MouseButton {
                side: MouseSide::Right,
                down: true,
                x,
                y,
            },
            WireCommand::MouseRightUp { x, y } => InputCommand::MouseButton {
                side: MouseSide::Right,
                down: false,
                x,
                y,
            },
            WireCommand::KeyDown { key_code } => InputCommand::KeyEvent {
                code: key_code,
                down: true,
            },
            WireCommand::KeyUp { key_code } => InputCommand::KeyEvent {
                code: key_code,
                down: false,
            },
            WireCommand::MouseScroll { delta_y } => InputCommand::Scroll { delta_y },
            WireCommand::ForceModifierReset => InputCommand::ModifierReset,
        }
    }
}

impl From<&InputCommand> for WireCommand {
    fn from(cmd: &InputCommand) -> Self {
        match *cmd {
            InputCommand::MouseMove { x, y } => WireCommand::MouseMove { x, y },
            InputCommand::MouseDrag { x, y } => WireCommand::MouseDrag { x, y },
            InputCommand::MouseButton {
                side: MouseSide::Left,
                down: true,
                x,
                y,
            } => WireCommand::MouseDown { x, y },
            InputCommand::MouseButton {
                side: MouseSide::Left,
                down: false,
                x,
                y,
            } => WireCommand::MouseUp { x, y },
            InputCommand::MouseButton {
                side: MouseSide::Right,
                down: true,
                x,
                y,
            } => WireCommand::MouseRightDown { x, y },
            InputCommand::MouseButton {
                side: MouseSide::Right,
                down: false,
                x,
                y,
            } => WireCommand::MouseRightUp { x, y },
            InputCommand::KeyEvent { code, down: true } => WireCommand::KeyDown { key_code: code },
            InputCommand::KeyEvent { code, down: false } => WireCommand::KeyUp { key_code: code },
            InputCommand::Scroll { delta_y } => WireCommand::MouseScroll { delta_y },
            InputCommand::ModifierReset => WireCommand::ForceModifierReset,
        }
    }
}

/// Errors produced while parsing one command line.
///
/// Both variants are per-line: the caller drops the line, logs, and keeps
/// the connection and any remaining buffered bytes.
#[derive(Debug, Error)]
pub enum CommandParseError {
    /// The line is not a syntactically valid JSON value.
    #[error("line is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The line is valid JSON but not a recognisable command object
    /// (unknown `type`, missing required field, wrong field type).
    #[error("command object rejected: {0}")]
    InvalidCommand(#[source] serde_json::Error),
}

/// Parses one newline-stripped command line into domain commands.
///
/// The line is first treated as an array of command objects; array elements
/// that fail to parse (unknown `type`, missing fields) are logged and
/// skipped while the rest of the array is kept, preserving order.  A
/// non-array line must be a single valid command object.
///
/// # Errors
///
/// Returns [`CommandParseError`] when the line as a whole must be dropped:
/// invalid JSON, or a single object that is not a recognisable command.
pub fn parse_line(line: &[u8]) -> Result<Vec<InputCommand>, CommandParseError> {
    let value: serde_json::Value =
        serde_json::from_slice(line).map_err(CommandParseError::InvalidJson)?;

    match value {
        serde_json::Value::Array(items) => {
            let mut commands = Vec::with_capacity(items.len());
            for item in items {
                match serde_json::from_value::<WireCommand>(item) {
                    Ok(wire) => commands.push(InputCommand::from(wire)),
                    Err(e) => warn!("ignoring unrecognised command in batch: {e}"),
                }
            }
            Ok(commands)
        }
        other => {
            let wire = serde_json::from_value::<WireCommand>(other)
                .map_err(CommandParseError::InvalidCommand)?;
            Ok(vec![InputCommand::from(wire)])
        }
    }
}

/// Serializes a command batch into one wire line (trailing `\n` included).
///
/// A single command serializes as a bare object; two or more serialize as an
/// array, matching what receivers accept.
///
/// # Errors
///
/// Returns the underlying `serde_json` error (non-finite floats are the only
/// realistic cause).
pub fn encode_line(commands: &[InputCommand]) -> Result<String, serde_json::Error> {
    let mut line = if commands.len() == 1 {
        serde_json::to_string(&WireCommand::from(&commands[0]))?
    } else {
        let wire: Vec<WireCommand> = commands.iter().map(WireCommand::from).collect();
        serde_json::to_string(&wire)?
    };
    line.push('\n');
    Ok(line)
}

/// Reassembles newline-delimited lines from arbitrary TCP chunks.
///
/// Bytes accumulate until a `0x0A` is buffered; [`next_line`] then removes
/// the line *and* its terminator, leaving any trailing partial line for the
/// next read.
///
/// [`next_line`]: LineAssembler::next_line
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: Vec<u8>,
}

impl LineAssembler {
    /// Creates an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a raw chunk to the internal buffer.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Removes and returns the next complete line, without its `\n`.
    ///
    /// Call in a loop until `None`: one chunk may complete several lines.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        let newline = self.buf.iter().position(|&b| b == 0x0A)?;
        let line = self.buf[..newline].to_vec();
        self.buf.drain(..=newline);
        Some(line)
    }

    /// Number of bytes buffered past the last complete line.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
