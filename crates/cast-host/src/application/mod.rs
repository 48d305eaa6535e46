//! Application layer use cases for the host.
//!
//! - **`produce_frames`** – One capture tick: obtain a still image from the
//!   `FrameSource`, JPEG-encode it via the `FrameEncoder` at the configured
//!   quality.  The stream endpoint frames and sends the result.
//!
//! - **`inject_input`** – Applies decoded [`cast_core::InputCommand`]s to
//!   the OS through an `InputInjector` implementation, including the
//!   move-versus-drag policy derived from observed button state.

pub mod inject_input;
pub mod produce_frames;
