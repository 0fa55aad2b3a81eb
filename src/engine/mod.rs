//! Frame orchestration: clock, camera, lights and render passes.

mod accessors;
/// The simulation clock and its pause/stop state machine.
pub mod clock;
/// Commands applied between frames.
pub mod command;
mod input;

use glam::{Mat4, Vec3};

use self::clock::SimulationClock;
use crate::camera::{OrbitCamera, Projection};
use crate::error::RenderError;
use crate::input::InputProcessor;
use crate::lighting::{Light, SimulationContext};
use crate::options::Options;
use crate::renderer::{RenderBackend, SceneInfo};
use crate::scene::Scene;
use crate::util::frame_timing::FrameTiming;

/// Replacement rasterization matrices for debugging the transform chain.
///
/// Shading keeps using the true camera view; only the matrices the
/// geometry is rasterized with are swapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOverride {
    /// View matrix used instead of the camera's.
    pub view: Mat4,
    /// Projection used instead of the viewport projection, if any.
    pub projection: Option<Mat4>,
}

/// Outcome of one [`SceneRenderEngine::render_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// All passes were issued and the frame was presented.
    Rendered,
    /// The simulation is stopped; nothing was touched.
    Skipped,
}

/// Per-frame driver of the shadowed multi-light renderer.
///
/// Owns the camera, the simulation clock, the light rig and the scene.
/// Drawing goes through a [`RenderBackend`] handed to
/// [`render_frame`](Self::render_frame), so the engine itself holds no GPU
/// state.
///
/// # Frame loop
///
/// Call [`render_frame`](Self::render_frame) once per redraw with a
/// monotonic timestamp in seconds. Call [`resize`](Self::resize) when the
/// viewport changes. Input is forwarded via
/// [`handle_input`](Self::handle_input) and
/// [`handle_key_press`](Self::handle_key_press), or applied directly with
/// [`execute`](Self::execute).
pub struct SceneRenderEngine {
    /// Orbit camera controller.
    camera: OrbitCamera,
    /// Perspective parameters; only the aspect varies per frame.
    projection: Projection,
    /// Simulated time and its pause/stop state.
    clock: SimulationClock,
    /// Lights in declaration order; the index is the light's slot.
    lights: Vec<Light>,
    /// Drawable actors and their meshes.
    scene: Scene,
    /// Raw input to command translation.
    input: InputProcessor,
    /// Viewport size in physical pixels.
    viewport: (u32, u32),
    /// Working view matrix of the last rendered frame.
    view_matrix: Mat4,
    /// Projection of the last rendered frame.
    projection_matrix: Mat4,
    /// Optional debug replacement of the rasterization matrices.
    view_override: Option<ViewOverride>,
    /// Color target clear value.
    background: [f32; 4],
    /// Color of the ambient pass.
    ambient_light_color: Vec3,
    /// Whether `debug_text` is shown by the viewer.
    debug_overlay: bool,
    /// Smoothed FPS and frame limiting.
    frame_timing: FrameTiming,
}

impl SceneRenderEngine {
    /// Engine over `scene` with the camera, clock and light rig described
    /// by `options`.
    #[must_use]
    pub fn new(options: &Options, scene: Scene) -> Self {
        let camera = OrbitCamera::new(&options.camera);
        let view_matrix = camera.world_to_camera();
        log::info!(
            "engine: {} actors, {} lights",
            scene.actors().len(),
            options.lighting.lights.len()
        );
        Self {
            camera,
            projection: Projection::from_options(&options.camera),
            clock: SimulationClock::new(),
            lights: Light::rig_from_options(&options.lighting),
            scene,
            input: InputProcessor::with_key_bindings(options.keybindings.clone()),
            viewport: (1, 1),
            view_matrix,
            projection_matrix: Mat4::IDENTITY,
            view_override: None,
            background: options.display.background,
            ambient_light_color: Vec3::from_array(options.lighting.ambient_color),
            debug_overlay: options.debug.show_overlay,
            frame_timing: FrameTiming::new(options.display.target_fps),
        }
    }

    /// Replace the light rig, e.g. with lights built in code.
    #[must_use]
    pub fn with_lights(mut self, lights: Vec<Light>) -> Self {
        self.lights = lights;
        self
    }

    /// Track a new viewport size. The projection picks it up on the next
    /// frame.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Install or clear the debug view override.
    pub fn set_view_override(&mut self, view_override: Option<ViewOverride>) {
        self.view_override = view_override;
    }

    /// Advance the simulation and draw one frame.
    ///
    /// Stopped frames return [`FrameStatus::Skipped`] before touching any
    /// state or the backend. Otherwise the order is: clock, projection,
    /// view, lights, actors, clear, ambient, then per light its shadowmap
    /// followed by its Phong contribution, and finally present.
    ///
    /// # Errors
    ///
    /// Backend failures other than a missing shadow target, which only
    /// downgrades that light to an unshadowed pass.
    pub fn render_frame<B: RenderBackend + ?Sized>(
        &mut self,
        frame_time: f64,
        backend: &mut B,
    ) -> Result<FrameStatus, RenderError> {
        let Some(sim_time) = self.clock.advance(frame_time) else {
            return Ok(FrameStatus::Skipped);
        };

        let (width, height) = self.viewport;
        self.projection_matrix = self.projection.matrix(width, height);
        let scene_view_matrix = self.camera.world_to_camera();
        self.view_matrix = scene_view_matrix;
        if let Some(view_override) = self.view_override {
            self.view_matrix = view_override.view;
            if let Some(projection) = view_override.projection {
                self.projection_matrix = projection;
            }
        }

        let context = SimulationContext { sim_time };
        for light in &mut self.lights {
            light.update_simulation(&context);
        }
        self.scene.update_simulation(&context);

        let info = SceneInfo {
            sim_time,
            view_matrix: self.view_matrix,
            scene_view_matrix,
            projection_matrix: self.projection_matrix,
            actors: self.scene.actors(),
            ambient_light_color: self.ambient_light_color,
        };

        backend.begin_frame(&info, self.background)?;
        self.scene.render_ambient(&info, backend)?;
        for (slot, light) in self.lights.iter().enumerate() {
            let shadow = light.render_shadowmap(slot, &info, backend)?;
            light.draw_phong_contribution(slot, &info, shadow, backend)?;
        }
        backend.end_frame()?;

        self.frame_timing.end_frame(frame_time);
        Ok(FrameStatus::Rendered)
    }
}
