//! Read-only queries and the debug overlay text for [`SceneRenderEngine`].

use glam::Mat4;

use super::clock::{ClockState, SimulationClock};
use super::SceneRenderEngine;
use crate::camera::OrbitCamera;
use crate::lighting::Light;
use crate::scene::Scene;

// ── State access ──

impl SceneRenderEngine {
    /// The orbit camera.
    #[must_use]
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// The simulation clock.
    #[must_use]
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Lights in slot order.
    #[must_use]
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// The drawable scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// View matrix the last frame was rasterized with.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    /// Projection matrix of the last frame.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// Viewport size in physical pixels.
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Whether the frame limiter allows a frame at `now` seconds.
    #[must_use]
    pub fn should_render(&self, now: f64) -> bool {
        self.frame_timing.should_render(now)
    }
}

// ── Debug overlay ──

impl SceneRenderEngine {
    /// Whether the debug overlay is visible.
    #[must_use]
    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    /// One line of diagnostics: sim time, camera angles in degrees,
    /// camera distance, smoothed FPS and clock state.
    #[must_use]
    pub fn debug_text(&self) -> String {
        let state = self.camera.state();
        let clock = match self.clock.state() {
            ClockState::Running => "running",
            ClockState::Paused => "paused",
            ClockState::Stopped => "stopped",
        };
        format!(
            "t={:.2}s  az={:.1}°  el={:.1}°  dist={:.2}  {:.0} fps  [{clock}]",
            self.clock.sim_time(),
            state.angle_azimuth.to_degrees(),
            state.angle_elevation.to_degrees(),
            self.camera.distance(),
            self.frame_timing.fps(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::command::EngineCommand;
    use crate::engine::SceneRenderEngine;
    use crate::options::Options;
    use crate::scene::Scene;

    #[test]
    fn debug_text_reports_preset_state() {
        let mut engine = SceneRenderEngine::new(&Options::default(), Scene::default());
        engine.execute(EngineCommand::ActivatePresetView);
        let text = engine.debug_text();
        assert!(text.starts_with("t=24.00s"), "{text}");
        assert!(text.contains("az=-90.0°"), "{text}");
        assert!(text.contains("el=-30.0°"), "{text}");
        assert!(text.contains("dist=12.00"), "{text}");
        assert!(text.ends_with("[paused]"), "{text}");
    }
}
