//! Mock input injector for unit testing.
//!
//! The real injector synthesises OS input events, which requires a desktop
//! session and actually moves the cursor on the test machine.  The mock
//! records every call into a `Mutex<Vec<...>>` so tests can assert exactly
//! what was injected and in what order, and exposes a settable
//! left-button-held flag to exercise the move-versus-drag policy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use cast_core::MouseSide;

use crate::application::inject_input::InputInjector;

/// One recorded injection call.
#[derive(Debug, Clone, PartialEq)]
pub enum InjectedEvent {
    Move { x: f64, y: f64 },
    Drag { x: f64, y: f64 },
    Button { side: MouseSide, down: bool, x: f64, y: f64 },
    Key { code: u16, down: bool },
    Scroll { delta_y: i32 },
    ModifierReset,
}

/// Records all injection calls without touching the OS.
#[derive(Default)]
pub struct MockInputInjector {
    events: Mutex<Vec<InjectedEvent>>,
    left_button_held: AtomicBool,
}

impl MockInputInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything injected so far, in call order.
    pub fn events(&self) -> Vec<InjectedEvent> {
        self.events.lock().expect("injector mutex poisoned").clone()
    }

    /// Sets the observed left-button state returned by `left_button_held`.
    pub fn set_left_button_held(&self, held: bool) {
        self.left_button_held.store(held, Ordering::Relaxed);
    }

    fn record(&self, event: InjectedEvent) {
        self.events.lock().expect("injector mutex poisoned").push(event);
    }
}

impl InputInjector for MockInputInjector {
    fn move_cursor(&self, x: f64, y: f64) {
        self.record(InjectedEvent::Move { x, y });
    }

    fn drag_cursor(&self, x: f64, y: f64) {
        self.record(InjectedEvent::Drag { x, y });
    }

    fn button(&self, side: MouseSide, down: bool, x: f64, y: f64) {
        // Track button state the way a real OS would, so command sequences
        // exercise the drag policy without manual flag setting.
        if side == MouseSide::Left {
            self.left_button_held.store(down, Ordering::Relaxed);
        }
        self.record(InjectedEvent::Button { side, down, x, y });
    }

    fn key(&self, code: u16, down: bool) {
        self.record(InjectedEvent::Key { code, down });
    }

    fn scroll(&self, delta_y: i32) {
        self.record(InjectedEvent::Scroll { delta_y });
    }

    fn reset_modifiers(&self) {
        self.record(InjectedEvent::ModifierReset);
    }

    fn left_button_held(&self) -> bool {
        self.left_button_held.load(Ordering::Relaxed)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_events_in_call_order() {
        let injector = MockInputInjector::new();
        injector.move_cursor(1.0, 2.0);
        injector.scroll(120);

        assert_eq!(
            injector.events(),
            vec![
                InjectedEvent::Move { x: 1.0, y: 2.0 },
                InjectedEvent::Scroll { delta_y: 120 },
            ]
        );
    }

    #[test]
    fn test_left_button_state_follows_button_events() {
        let injector = MockInputInjector::new();
        assert!(!injector.left_button_held());

        injector.button(MouseSide::Left, true, 0.0, 0.0);
        assert!(injector.left_button_held());

        injector.button(MouseSide::Left, false, 0.0, 0.0);
        assert!(!injector.left_button_held());
    }

    #[test]
    fn test_right_button_does_not_affect_left_state() {
        let injector = MockInputInjector::new();
        injector.button(MouseSide::Right, true, 0.0, 0.0);
        assert!(!injector.left_button_held());
    }
}
