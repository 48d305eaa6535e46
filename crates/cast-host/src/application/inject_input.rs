//! ApplyInputUseCase: applies decoded commands to the local input subsystem.
//!
//! The use case sits between the command endpoint's read loop and an
//! [`InputInjector`] implementation.  Injection is best-effort and
//! fire-and-forget — the protocol has no failure channel for it — so the
//! trait methods return `()` and implementations log their own trouble.
//!
//! # Move-versus-drag policy
//!
//! A plain `MouseMove` injects as a *drag* when the injector reports the
//! left button currently held, so remote drags track correctly even if the
//! viewer only sends moves between its down/up events.  An explicit
//! `MouseDrag` always injects as a drag regardless of observed state.

use std::sync::Arc;

use cast_core::{InputCommand, MouseSide};
use tracing::debug;

/// Platform input injection seam.
///
/// Each supported OS provides an implementation in the infrastructure
/// layer; tests use a recording mock.  All methods are fire-and-forget.
pub trait InputInjector: Send + Sync {
    /// Moves the cursor to an absolute position in capture-space pixels.
    fn move_cursor(&self, x: f64, y: f64);

    /// Moves the cursor while reporting a held left button (drag).
    fn drag_cursor(&self, x: f64, y: f64);

    /// Presses or releases a mouse button at a position.
    fn button(&self, side: MouseSide, down: bool, x: f64, y: f64);

    /// Presses or releases a key given its native virtual key code.
    fn key(&self, code: u16, down: bool);

    /// Scrolls the wheel vertically.
    fn scroll(&self, delta_y: i32);

    /// Releases any modifier keys the OS believes are held.
    fn reset_modifiers(&self);

    /// Whether the OS currently observes the left button held.
    ///
    /// Drives the move-versus-drag policy above.
    fn left_button_held(&self) -> bool;
}

/// The apply-input use case.
///
/// Commands are applied one at a time on the calling task; the command
/// endpoint owns exactly one of these per process, which serializes
/// injection order across sessions.
pub struct ApplyInputUseCase {
    injector: Arc<dyn InputInjector>,
}

impl ApplyInputUseCase {
    pub fn new(injector: Arc<dyn InputInjector>) -> Self {
        Self { injector }
    }

    /// Applies one command.
    pub fn apply(&self, command: &InputCommand) {
        match *command {
            InputCommand::MouseMove { x, y } => {
                if self.injector.left_button_held() {
                    debug!("move with button held, injecting drag to ({x}, {y})");
                    self.injector.drag_cursor(x, y);
                } else {
                    self.injector.move_cursor(x, y);
                }
            }
            InputCommand::MouseDrag { x, y } => self.injector.drag_cursor(x, y),
            InputCommand::MouseButton { side, down, x, y } => {
                self.injector.button(side, down, x, y)
            }
            InputCommand::KeyEvent { code, down } => self.injector.key(code, down),
            InputCommand::Scroll { delta_y } => self.injector.scroll(delta_y),
            InputCommand::ModifierReset => self.injector.reset_modifiers(),
        }
    }

    /// Applies a batch in order, one at a time.
    pub fn apply_all(&self, commands: &[InputCommand]) {
        for command in commands {
            self.apply(command);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
