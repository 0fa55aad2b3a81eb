//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether it comes from a key press, a mouse
//! gesture or a programmatic call, is an `EngineCommand` passed to
//! [`SceneRenderEngine::execute`](super::SceneRenderEngine::execute).

use glam::Vec2;

/// A discrete action applied between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCommand {
    // ── Clock ───────────────────────────────────────────────────────
    /// Pause or resume simulated time. Ignored while stopped.
    TogglePause,

    /// Stop rendering entirely, or restart from the preset view.
    ToggleStop,

    /// Jump to the canonical camera pose at `sim_time = 24`, paused.
    ActivatePresetView,

    // ── Display ─────────────────────────────────────────────────────
    /// Show or hide the debug overlay text.
    ToggleDebugOverlay,

    // ── Camera ──────────────────────────────────────────────────────
    /// Orbit the camera by `delta` pixels of mouse movement.
    RotateCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Pan the camera target by `delta` pixels of mouse movement.
    PanCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Zoom the camera (positive = zoom in, negative = zoom out).
    Zoom {
        /// Scroll amount.
        delta: f32,
    },
}
