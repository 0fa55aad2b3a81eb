//! The seam between frame orchestration and the GPU.
//!
//! Every pass the engine, the lights and the scene issue goes through
//! [`RenderBackend`]. The wgpu implementation is
//! [`GpuBackend`](crate::gpu::backend::GpuBackend); tests use a recording
//! double so pass ordering can be checked without a device.

use glam::{Mat4, Vec3};

use crate::error::RenderError;
use crate::lighting::LightState;
use crate::scene::Actor;

/// Read-only per-frame data handed to every pass.
#[derive(Debug, Clone, Copy)]
pub struct SceneInfo<'a> {
    /// Simulated seconds at this frame.
    pub sim_time: f64,
    /// View matrix used for rasterization. Normally the camera view; a
    /// debug override may replace it.
    pub view_matrix: Mat4,
    /// The true camera view, used for camera-relative shading.
    pub scene_view_matrix: Mat4,
    /// Projection used for rasterization.
    pub projection_matrix: Mat4,
    /// Drawables, in draw order.
    pub actors: &'a [Actor],
    /// Color of the ambient pass.
    pub ambient_light_color: Vec3,
}

impl<'a> SceneInfo<'a> {
    #[cfg(test)]
    pub(crate) fn for_tests(actors: &'a [Actor]) -> Self {
        Self {
            sim_time: 0.0,
            view_matrix: Mat4::IDENTITY,
            scene_view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            actors,
            ambient_light_color: Vec3::splat(0.5),
        }
    }
}

/// Whether a Phong pass may sample its light's shadowmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowMode {
    /// The shadowmap was rendered this frame.
    Shadowed,
    /// No usable shadowmap; the light reaches every fragment.
    Unshadowed,
}

/// Pass-level drawing operations.
///
/// A frame is `begin_frame`, then any number of passes, then `end_frame`.
/// `slot` identifies a light by its index in the rig; each slot owns a
/// private shadow target.
pub trait RenderBackend {
    /// Start a frame: acquire the color target and clear color and depth.
    ///
    /// # Errors
    ///
    /// Surface acquisition failures.
    fn begin_frame(
        &mut self,
        info: &SceneInfo<'_>,
        background: [f32; 4],
    ) -> Result<(), RenderError>;

    /// Draw every actor with ambient-only shading, writing depth.
    ///
    /// # Errors
    ///
    /// [`RenderError::NoFrameInProgress`] outside a frame.
    fn draw_ambient(&mut self, info: &SceneInfo<'_>) -> Result<(), RenderError>;

    /// Render distance-to-light for every actor into the slot's cubemap.
    ///
    /// # Errors
    ///
    /// [`RenderError::ShadowTargetUnavailable`] when the slot has no usable
    /// target.
    fn render_shadowmap(
        &mut self,
        slot: usize,
        light: &LightState,
        info: &SceneInfo<'_>,
    ) -> Result<(), RenderError>;

    /// Add one light's diffuse and specular term into the color target.
    ///
    /// # Errors
    ///
    /// [`RenderError::NoFrameInProgress`] outside a frame.
    fn draw_phong(
        &mut self,
        slot: usize,
        light: &LightState,
        info: &SceneInfo<'_>,
        shadow: ShadowMode,
    ) -> Result<(), RenderError>;

    /// Submit the recorded work and present.
    ///
    /// # Errors
    ///
    /// [`RenderError::NoFrameInProgress`] outside a frame.
    fn end_frame(&mut self) -> Result<(), RenderError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use glam::{Mat4, Vec3};

    use super::{RenderBackend, SceneInfo, ShadowMode};
    use crate::error::RenderError;
    use crate::lighting::LightState;

    /// One backend call, as seen by [`RecordingBackend`].
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        BeginFrame { background: [f32; 4] },
        Ambient { actors: usize },
        Shadow { slot: usize },
        Phong { slot: usize, shadow: ShadowMode },
        EndFrame,
    }

    /// Matrices and time captured at `begin_frame`.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub(crate) struct SeenFrame {
        pub sim_time: f64,
        pub view: Mat4,
        pub scene_view: Mat4,
        pub projection: Mat4,
        pub ambient: Vec3,
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingBackend {
        pub calls: Vec<Call>,
        pub frames: Vec<SeenFrame>,
        /// Light positions seen by shadow passes, per slot.
        pub shadow_positions: Vec<(usize, Vec3)>,
        pub fail_shadow_slots: Vec<usize>,
        in_frame: bool,
    }

    impl RecordingBackend {
        fn require_frame(&self) -> Result<(), RenderError> {
            if self.in_frame {
                Ok(())
            } else {
                Err(RenderError::NoFrameInProgress)
            }
        }
    }

    impl RenderBackend for RecordingBackend {
        fn begin_frame(
            &mut self,
            info: &SceneInfo<'_>,
            background: [f32; 4],
        ) -> Result<(), RenderError> {
            self.in_frame = true;
            self.frames.push(SeenFrame {
                sim_time: info.sim_time,
                view: info.view_matrix,
                scene_view: info.scene_view_matrix,
                projection: info.projection_matrix,
                ambient: info.ambient_light_color,
            });
            self.calls.push(Call::BeginFrame { background });
            Ok(())
        }

        fn draw_ambient(
            &mut self,
            info: &SceneInfo<'_>,
        ) -> Result<(), RenderError> {
            self.require_frame()?;
            self.calls.push(Call::Ambient {
                actors: info.actors.len(),
            });
            Ok(())
        }

        fn render_shadowmap(
            &mut self,
            slot: usize,
            light: &LightState,
            _info: &SceneInfo<'_>,
        ) -> Result<(), RenderError> {
            self.require_frame()?;
            self.calls.push(Call::Shadow { slot });
            if self.fail_shadow_slots.contains(&slot) {
                return Err(RenderError::ShadowTargetUnavailable { slot });
            }
            self.shadow_positions.push((slot, light.position));
            Ok(())
        }

        fn draw_phong(
            &mut self,
            slot: usize,
            _light: &LightState,
            _info: &SceneInfo<'_>,
            shadow: ShadowMode,
        ) -> Result<(), RenderError> {
            self.require_frame()?;
            self.calls.push(Call::Phong { slot, shadow });
            Ok(())
        }

        fn end_frame(&mut self) -> Result<(), RenderError> {
            self.require_frame()?;
            self.in_frame = false;
            self.calls.push(Call::EndFrame);
            Ok(())
        }
    }
}
