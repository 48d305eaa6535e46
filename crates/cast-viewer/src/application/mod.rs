//! Application layer use cases for the viewer.
//!
//! - **`reassemble_frames`** – Turns the raw stream-channel byte flow back
//!   into frame payloads, locks the capture aspect ratio from the first
//!   decodable frame, and hands payloads to an async render sink.
//!
//! - **`capture_input`** – Converts local UI events into wire commands:
//!   coordinate scaling, key translation, pointer-move rate limiting, and
//!   the triple-Escape modifier reset.

pub mod capture_input;
pub mod reassemble_frames;
