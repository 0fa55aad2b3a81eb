//! Command execution and input dispatch for [`SceneRenderEngine`].

use super::command::EngineCommand;
use super::SceneRenderEngine;
use crate::input::InputEvent;

impl SceneRenderEngine {
    /// Apply a command. The effect is visible to the next frame.
    pub fn execute(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::TogglePause => {
                self.clock.toggle_pause();
                log::info!("simulation paused: {}", self.clock.is_paused());
            }
            EngineCommand::ToggleStop => {
                let stopped = self.clock.toggle_stop();
                if !stopped {
                    self.activate_preset_view();
                    self.clock.resume();
                }
                log::info!("simulation stopped: {stopped}");
            }
            EngineCommand::ActivatePresetView => {
                self.activate_preset_view();
                log::info!("preset view at sim time {}", self.clock.sim_time());
            }
            EngineCommand::ToggleDebugOverlay => {
                self.debug_overlay = !self.debug_overlay;
                log::info!("debug overlay: {}", self.debug_overlay);
            }
            EngineCommand::RotateCamera { delta } => self.camera.rotate(delta),
            EngineCommand::PanCamera { delta } => self.camera.pan(delta),
            EngineCommand::Zoom { delta } => self.camera.zoom(delta),
        }
    }

    /// Process a platform-agnostic input event, executing the command it
    /// produces, if any.
    pub fn handle_input(&mut self, event: InputEvent) {
        if let Some(command) = self.input.handle_event(event) {
            self.execute(command);
        }
    }

    /// Execute the command bound to `key`. Returns whether one was bound.
    pub fn handle_key_press(&mut self, key: &str) -> bool {
        match self.input.handle_key_press(key) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    fn activate_preset_view(&mut self) {
        self.camera.apply_preset();
        self.clock.activate_preset();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::engine::clock::ClockState;
    use crate::engine::SceneRenderEngine;
    use crate::input::{InputEvent, MouseButton};
    use crate::options::Options;
    use crate::scene::Scene;

    fn engine() -> SceneRenderEngine {
        SceneRenderEngine::new(&Options::default(), Scene::default())
    }

    #[test]
    fn bound_keys_execute() {
        let mut engine = engine();
        assert!(engine.handle_key_press("KeyP"));
        assert_eq!(engine.clock().state(), ClockState::Paused);
        assert!(engine.handle_key_press("KeyZ"));
        assert!(engine.debug_overlay());
        assert!(!engine.handle_key_press("KeyQ"));
    }

    #[test]
    fn drag_rotates_camera() {
        let mut engine = engine();
        let before = *engine.camera().state();
        engine.handle_input(InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        engine.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        engine.handle_input(InputEvent::CursorMoved { x: 10.0, y: 0.0 });
        let after = engine.camera().state();
        assert!((after.angle_azimuth - before.angle_azimuth - 10.0 * 0.005).abs() < 1e-6);
        assert_eq!(after.angle_elevation, before.angle_elevation);
    }

    #[test]
    fn repeated_toggles_are_safe() {
        let mut engine = engine();
        for _ in 0..4 {
            engine.execute(crate::engine::command::EngineCommand::ToggleStop);
        }
        assert_eq!(engine.clock().state(), ClockState::Running);
        engine.execute(crate::engine::command::EngineCommand::RotateCamera {
            delta: Vec2::ZERO,
        });
    }
}
