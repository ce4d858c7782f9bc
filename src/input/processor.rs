//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor position,
//! primary-button state) and the key-binding map. It is the only thing
//! that sits between raw window events and the engine's
//! [`execute`](crate::TriviewEngine::execute) method.

use glam::Vec2;

use super::event::{InputEvent, MouseButton};
use crate::engine::command::TriviewCommand;
use crate::options::KeybindingOptions;

/// Overview dolly distance per scroll line.
const DOLLY_PER_LINE: f32 = 1.0;

/// Converts raw window events into [`TriviewCommand`]s.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
///
/// if let Some(cmd) = input_processor.handle_key_press("Digit1") {
///     engine.execute(cmd);
/// }
/// ```
pub struct InputProcessor {
    /// Last known cursor position in physical pixels.
    cursor: Vec2,
    /// Whether the primary mouse button is currently held.
    mouse_pressed: bool,
    /// Key string → action mapping.
    key_bindings: KeybindingOptions,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key_bindings(KeybindingOptions::default())
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeybindingOptions) -> Self {
        Self {
            cursor: Vec2::ZERO,
            mouse_pressed: false,
            key_bindings,
        }
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Whether the primary mouse button is pressed.
    #[must_use]
    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }

    /// Replace the key bindings (after an options reload).
    pub fn set_key_bindings(&mut self, key_bindings: KeybindingOptions) {
        self.key_bindings = key_bindings;
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<TriviewCommand> {
        self.key_bindings.lookup(key).map(|action| action.to_command())
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<TriviewCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.cursor = Vec2::new(x, y);
                Some(TriviewCommand::PointerMoved {
                    position: self.cursor,
                })
            }
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed)
            }
            InputEvent::Scroll { delta } => {
                Some(TriviewCommand::DollyOverview {
                    delta: -delta * DOLLY_PER_LINE,
                })
            }
        }
    }

    /// Press/release of the primary button starts or ends a gizmo drag.
    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Option<TriviewCommand> {
        if button != MouseButton::Left {
            return None;
        }

        if pressed {
            self.mouse_pressed = true;
            return Some(TriviewCommand::PointerPressed {
                position: self.cursor,
            });
        }

        // Releases without a matching press (e.g. the press landed on the
        // panel) are ignored.
        if !std::mem::replace(&mut self.mouse_pressed, false) {
            return None;
        }
        Some(TriviewCommand::PointerReleased)
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;
    use crate::scene::TrackedCamera;

    fn press(pressed: bool) -> InputEvent {
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed,
        }
    }

    #[test]
    fn default_keys_select_and_deselect() {
        let input = InputProcessor::new();
        assert_eq!(
            input.handle_key_press("Digit1"),
            Some(TriviewCommand::Select {
                camera: TrackedCamera::Green
            })
        );
        assert_eq!(
            input.handle_key_press("Digit2"),
            Some(TriviewCommand::Select {
                camera: TrackedCamera::Red
            })
        );
        assert_eq!(
            input.handle_key_press("Escape"),
            Some(TriviewCommand::Deselect)
        );
        assert_eq!(input.handle_key_press("Digit3"), None);
    }

    #[test]
    fn rebinding_replaces_the_old_key() {
        let mut bindings = KeybindingOptions::default();
        bindings.bind(KeyAction::Deselect, "KeyX");
        let input = InputProcessor::with_key_bindings(bindings);
        assert_eq!(
            input.handle_key_press("KeyX"),
            Some(TriviewCommand::Deselect)
        );
        assert_eq!(input.handle_key_press("Escape"), None);
    }

    #[test]
    fn drag_lifecycle_carries_cursor_position() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 10.0, y: 20.0 }),
            Some(TriviewCommand::PointerMoved {
                position: Vec2::new(10.0, 20.0)
            })
        );
        assert_eq!(
            input.handle_event(press(true)),
            Some(TriviewCommand::PointerPressed {
                position: Vec2::new(10.0, 20.0)
            })
        );
        assert!(input.mouse_pressed());
        let _ = input.handle_event(InputEvent::CursorMoved { x: 15.0, y: 20.0 });
        assert_eq!(input.cursor(), Vec2::new(15.0, 20.0));
        assert_eq!(
            input.handle_event(press(false)),
            Some(TriviewCommand::PointerReleased)
        );
        assert!(!input.mouse_pressed());
    }

    #[test]
    fn stray_release_and_other_buttons_are_ignored() {
        let mut input = InputProcessor::new();
        assert_eq!(input.handle_event(press(false)), None);
        let right = InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        };
        assert_eq!(input.handle_event(right), None);
        assert!(!input.mouse_pressed());
    }

    #[test]
    fn scroll_up_dollies_towards_the_scene() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::Scroll { delta: 2.0 }),
            Some(TriviewCommand::DollyOverview { delta: -2.0 })
        );
    }
}
