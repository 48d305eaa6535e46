//! ViewerInputCapture: turns local UI events into wire commands.
//!
//! The embedding shell feeds [`LocalEvent`]s (viewport-local coordinates,
//! viewer key codes); this use case produces ready-to-send
//! [`InputCommand`] batches:
//!
//! - Coordinates scale into the capture source's pixel space using the most
//!   recently observed capture dimensions.  Until a frame has yielded
//!   dimensions, coordinates pass through unscaled.
//! - Pointer moves are limited to 60 per second.  Intervening moves are
//!   dropped, but the newest is parked in a pending slot and released by
//!   [`flush_pending`](ViewerInputCapture::handle) once the interval
//!   elapses, so the final position is never lost.
//! - Button events are batched with a preceding position-sync `mouseMove`
//!   in the same line.
//! - Key codes translate through the static table; keys with no native
//!   equivalent are dropped.
//! - Pressing Escape three times within 500 ms emits a `ModifierReset` in
//!   addition to the key events themselves.

use std::time::{Duration, Instant};

use cast_core::{viewer_to_native, viewport_to_source, InputCommand, MouseSide, PixelSize};
use tracing::debug;

use crate::application::reassemble_frames::SharedDimensions;

/// Minimum spacing between emitted pointer moves (60 per second).
pub const POINTER_MIN_INTERVAL: Duration = Duration::from_micros(16_667);

/// Viewer key code of the designated modifier-reset key (Escape).
pub const RESET_KEY_CODE: u16 = 27;

/// Presses of the reset key that must land inside the window.
pub const RESET_PRESS_COUNT: u8 = 3;

/// Maximum spacing between consecutive reset-key presses.
pub const RESET_PRESS_WINDOW: Duration = Duration::from_millis(500);

/// Largest wheel delta forwarded per event; browsers report anything from
/// ±3 to ±500 per notch depending on device.
const MAX_SCROLL_DELTA: f64 = 120.0;

/// One local UI event in viewer-local coordinates and key codes.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalEvent {
    PointerMoved { x: f64, y: f64 },
    ButtonPressed { side: MouseSide, x: f64, y: f64 },
    ButtonReleased { side: MouseSide, x: f64, y: f64 },
    KeyPressed { code: u16 },
    KeyReleased { code: u16 },
    Wheel { delta_y: f64 },
}

/// Rate limiter for pointer-move emission.
///
/// `offer` either emits the move now or parks it; `flush` releases a parked
/// move once the interval has elapsed.  The parked slot holds exactly one
/// move — the newest — so a burst collapses to its final position.
#[derive(Debug)]
struct PointerThrottle {
    min_interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<InputCommand>,
}

impl PointerThrottle {
    fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_emit: None,
            pending: None,
        }
    }

    fn due(&self, now: Instant) -> bool {
        self.last_emit
            .map_or(true, |last| now.duration_since(last) >= self.min_interval)
    }

    fn offer(&mut self, command: InputCommand, now: Instant) -> Option<InputCommand> {
        if self.due(now) {
            self.last_emit = Some(now);
            self.pending = None;
            Some(command)
        } else {
            self.pending = Some(command);
            None
        }
    }

    fn flush(&mut self, now: Instant) -> Option<InputCommand> {
        if self.pending.is_some() && self.due(now) {
            self.last_emit = Some(now);
            self.pending.take()
        } else {
            None
        }
    }
}

/// Detects N presses of the reset key within a rolling window.
#[derive(Debug)]
struct ResetKeyDetector {
    window: Duration,
    required: u8,
    presses: u8,
    last_press: Option<Instant>,
}

impl ResetKeyDetector {
    fn new(window: Duration, required: u8) -> Self {
        Self {
            window,
            required,
            presses: 0,
            last_press: None,
        }
    }

    /// Registers a reset-key press; `true` when the streak completes.
    fn register_press(&mut self, now: Instant) -> bool {
        let in_window = self
            .last_press
            .is_some_and(|last| now.duration_since(last) < self.window);
        self.presses = if in_window { self.presses + 1 } else { 1 };
        self.last_press = Some(now);

        if self.presses >= self.required {
            self.presses = 0;
            true
        } else {
            false
        }
    }

    /// Any other key breaks the streak.
    fn interrupt(&mut self) {
        self.presses = 0;
    }
}

/// The input capture use case.
pub struct ViewerInputCapture {
    dims: SharedDimensions,
    viewport: PixelSize,
    throttle: PointerThrottle,
    reset: ResetKeyDetector,
}

impl ViewerInputCapture {
    /// Creates the capture with the current viewport size; call
    /// [`set_viewport`](ViewerInputCapture::set_viewport) on resize.
    pub fn new(dims: SharedDimensions, viewport: PixelSize) -> Self {
        Self {
            dims,
            viewport,
            throttle: PointerThrottle::new(POINTER_MIN_INTERVAL),
            reset: ResetKeyDetector::new(RESET_PRESS_WINDOW, RESET_PRESS_COUNT),
        }
    }

    /// Updates the viewport size used for coordinate mapping.
    pub fn set_viewport(&mut self, viewport: PixelSize) {
        self.viewport = viewport;
    }

    /// Converts one local event into the commands to send, already in the
    /// order they must be applied.  An empty result means nothing goes on
    /// the wire (throttled move, unmapped key).
    pub fn handle(&mut self, event: LocalEvent, now: Instant) -> Vec<InputCommand> {
        match event {
            LocalEvent::PointerMoved { x, y } => {
                let (sx, sy) = self.map_point(x, y);
                self.throttle
                    .offer(InputCommand::MouseMove { x: sx, y: sy }, now)
                    .map_or_else(Vec::new, |cmd| vec![cmd])
            }
            LocalEvent::ButtonPressed { side, x, y } => {
                let (sx, sy) = self.map_point(x, y);
                vec![
                    InputCommand::MouseMove { x: sx, y: sy },
                    InputCommand::MouseButton {
                        side,
                        down: true,
                        x: sx,
                        y: sy,
                    },
                ]
            }
            LocalEvent::ButtonReleased { side, x, y } => {
                let (sx, sy) = self.map_point(x, y);
                vec![
                    InputCommand::MouseMove { x: sx, y: sy },
                    InputCommand::MouseButton {
                        side,
                        down: false,
                        x: sx,
                        y: sy,
                    },
                ]
            }
            LocalEvent::KeyPressed { code } => {
                let mut commands = Vec::new();
                match viewer_to_native(code) {
                    Some(native) => commands.push(InputCommand::KeyEvent {
                        code: native,
                        down: true,
                    }),
                    None => debug!("dropping unmapped key code {code}"),
                }
                if code == RESET_KEY_CODE {
                    if self.reset.register_press(now) {
                        debug!("triple-press detected, requesting modifier reset");
                        commands.push(InputCommand::ModifierReset);
                    }
                } else {
                    self.reset.interrupt();
                }
                commands
            }
            LocalEvent::KeyReleased { code } => match viewer_to_native(code) {
                Some(native) => vec![InputCommand::KeyEvent {
                    code: native,
                    down: false,
                }],
                None => Vec::new(),
            },
            LocalEvent::Wheel { delta_y } => {
                vec![InputCommand::Scroll {
                    delta_y: normalize_scroll(delta_y),
                }]
            }
        }
    }

    /// Releases a throttled pointer move once its interval has elapsed.
    ///
    /// The event pump calls this periodically so the newest position is
    /// sent even when the pointer has stopped moving.
    pub fn flush_pending(&mut self, now: Instant) -> Option<InputCommand> {
        self.throttle.flush(now)
    }

    fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        match self.dims.get() {
            Some(capture) => viewport_to_source(x, y, self.viewport, capture),
            // No frame has yielded dimensions yet; pass through unscaled.
            None => (x, y),
        }
    }
}

/// Clamps a raw wheel delta to ±120 and flips it into the host's scroll
/// direction.
fn normalize_scroll(raw: f64) -> i32 {
    (-(raw.signum() * raw.abs().min(MAX_SCROLL_DELTA))) as i32
}

// ── Tests ─────────────────────────────────────────────────────────────────────
