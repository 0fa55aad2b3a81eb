//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! held buttons, modifier keys) and the key-binding map. It is the only
//! thing that sits between raw window events and
//! [`SceneRenderEngine::execute`](crate::engine::SceneRenderEngine::execute).

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use crate::engine::command::EngineCommand;

/// Maps physical key strings to [`EngineCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyP"`, `"KeyS"`, `"Escape"`, etc.
///
/// Only discrete commands make sense as key bindings; parameterized
/// commands like `RotateCamera` come from the pointer gestures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the parameterless subset of [`EngineCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Pause or resume the simulation clock.
    TogglePause,
    /// Stop or restart rendering.
    ToggleStop,
    /// Jump to the canonical camera/time composition.
    ActivatePresetView,
    /// Show or hide the debug overlay.
    ToggleDebugOverlay,
}

impl KeyCommandTag {
    /// Convert to the corresponding parameterless [`EngineCommand`].
    fn to_command(self) -> EngineCommand {
        match self {
            Self::TogglePause => EngineCommand::TogglePause,
            Self::ToggleStop => EngineCommand::ToggleStop,
            Self::ActivatePresetView => EngineCommand::ActivatePresetView,
            Self::ToggleDebugOverlay => EngineCommand::ToggleDebugOverlay,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyP".into(), KeyCommandTag::TogglePause),
            ("KeyS".into(), KeyCommandTag::ToggleStop),
            ("KeyC".into(), KeyCommandTag::ActivatePresetView),
            ("KeyZ".into(), KeyCommandTag::ToggleDebugOverlay),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<EngineCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding of that key.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`EngineCommand`]s.
///
/// Dragging with the left or middle button orbits the camera; holding
/// shift while dragging pans instead.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
///
/// if let Some(cmd) = input_processor.handle_key_press("KeyP") {
///     engine.execute(cmd);
/// }
/// ```
pub struct InputProcessor {
    /// Last cursor position, `None` until the first move.
    last_cursor: Option<Vec2>,
    /// Whether the left button is held.
    left_pressed: bool,
    /// Whether the middle button is held.
    middle_pressed: bool,
    /// Whether the shift modifier is currently held.
    shift_pressed: bool,
    /// Key string → command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key_bindings(KeyBindings::default())
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            last_cursor: None,
            left_pressed: false,
            middle_pressed: false,
            shift_pressed: false,
            key_bindings,
        }
    }

    /// Whether a drag button (left or middle) is held.
    #[must_use]
    pub fn dragging(&self) -> bool {
        self.left_pressed || self.middle_pressed
    }

    /// Whether the shift modifier is held.
    #[must_use]
    pub fn shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<EngineCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<EngineCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                match button {
                    MouseButton::Left => self.left_pressed = pressed,
                    MouseButton::Middle => self.middle_pressed = pressed,
                    MouseButton::Right => {}
                }
                None
            }
            InputEvent::Scroll { delta } => {
                Some(EngineCommand::Zoom { delta })
            }
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }

    /// Cursor moved: compute the delta and maybe produce a camera command.
    fn handle_cursor_moved(
        &mut self,
        x: f32,
        y: f32,
    ) -> Option<EngineCommand> {
        let current = Vec2::new(x, y);
        let delta = self
            .last_cursor
            .map_or(Vec2::ZERO, |previous| current - previous);
        self.last_cursor = Some(current);

        if !self.dragging() || delta == Vec2::ZERO {
            return None;
        }
        if self.shift_pressed {
            Some(EngineCommand::PanCamera { delta })
        } else {
            Some(EngineCommand::RotateCamera { delta })
        }
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

    fn press(button: MouseButton) -> InputEvent {
        InputEvent::MouseButton {
            button,
            pressed: true,
        }
    }

    #[test]
    fn hover_without_button_does_nothing() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 10.0, y: 10.0 }),
            None
        );
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 20.0, y: 15.0 }),
            None
        );
    }

    #[test]
    fn left_drag_rotates() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 10.0, y: 10.0 });
        let _ = input.handle_event(press(MouseButton::Left));
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 13.0, y: 6.0 }),
            Some(EngineCommand::RotateCamera {
                delta: Vec2::new(3.0, -4.0)
            })
        );
    }

    #[test]
    fn middle_drag_with_shift_pans() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        let _ = input.handle_event(press(MouseButton::Middle));
        let _ = input.handle_event(InputEvent::ModifiersChanged { shift: true });
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 5.0, y: 1.0 }),
            Some(EngineCommand::PanCamera {
                delta: Vec2::new(5.0, 1.0)
            })
        );
    }

    #[test]
    fn right_button_does_not_drag() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        let _ = input.handle_event(press(MouseButton::Right));
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 5.0, y: 1.0 }),
            None
        );
    }

    #[test]
    fn release_ends_drag() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(press(MouseButton::Left));
        let _ = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        assert!(!input.dragging());
    }

    #[test]
    fn scroll_zooms() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::Scroll { delta: -1.0 }),
            Some(EngineCommand::Zoom { delta: -1.0 })
        );
    }

    #[test]
    fn rebinding_replaces_key() {
        let mut bindings = KeyBindings::default();
        bindings.bind("Space", KeyCommandTag::TogglePause);
        let input = InputProcessor::with_key_bindings(bindings);
        assert_eq!(
            input.handle_key_press("Space"),
            Some(EngineCommand::TogglePause)
        );
        assert_eq!(
            input.handle_key_press("KeyS"),
            Some(EngineCommand::ToggleStop)
        );
    }
}
