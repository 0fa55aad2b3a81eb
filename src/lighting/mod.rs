//! Point lights and their two-phase rendering contract.
//!
//! Each light carries its current [`LightState`] and a [`LightMotion`]
//! capability: either it stays where it was placed, or an update function
//! re-derives its state from the simulation clock every frame.
//!
//! Per frame, for every light and in this order:
//!
//! 1. [`Light::update_simulation`] (before any pass runs),
//! 2. [`Light::render_shadowmap`] into the light-private cubemap,
//! 3. [`Light::draw_phong_contribution`], additive into the shared color
//!    target and gated by the shadowmap from step 2.

use std::fmt;

use glam::Vec3;

use crate::error::RenderError;
use crate::options::{LightOptions, LightingOptions, OrbitPath};
use crate::renderer::{RenderBackend, SceneInfo, ShadowMode};

/// Simulation values handed to time-driven state updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationContext {
    /// Simulated seconds since the session started.
    pub sim_time: f64,
}

/// The per-frame mutable part of a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    /// World-space position.
    pub position: Vec3,
    /// Linear RGB color.
    pub color: Vec3,
    /// Scalar intensity.
    pub intensity: f32,
}

/// Update function of a dynamic light. It may rewrite any field of the
/// state, typically the position.
pub type LightUpdateFn =
    Box<dyn FnMut(&mut LightState, &SimulationContext) + Send>;

/// How a light's state evolves with simulation time.
pub enum LightMotion {
    /// The state never changes after construction.
    Fixed,
    /// The state is recomputed from the simulation context every frame.
    Dynamic(LightUpdateFn),
}

impl fmt::Debug for LightMotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => f.write_str("Fixed"),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// A point light in the rig.
#[derive(Debug)]
pub struct Light {
    state: LightState,
    motion: LightMotion,
}

impl Light {
    /// A light that stays at `position`.
    #[must_use]
    pub fn fixed(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            state: LightState {
                position,
                color,
                intensity,
            },
            motion: LightMotion::Fixed,
        }
    }

    /// A light whose state is driven by `update`. `initial` is what passes
    /// would see before the first simulation update.
    #[must_use]
    pub fn dynamic(
        initial: LightState,
        update: impl FnMut(&mut LightState, &SimulationContext) + Send + 'static,
    ) -> Self {
        Self {
            state: initial,
            motion: LightMotion::Dynamic(Box::new(update)),
        }
    }

    /// Build a light from one declarative entry.
    #[must_use]
    pub fn from_options(options: &LightOptions) -> Self {
        let position = options.position.map_or(Vec3::ZERO, Vec3::from_array);
        let color = Vec3::from_array(options.color);
        match options.orbit {
            Some(path) => Self::dynamic(
                LightState {
                    position,
                    color,
                    intensity: options.intensity,
                },
                orbit_update(path),
            ),
            None => Self::fixed(position, color, options.intensity),
        }
    }

    /// Build the whole rig, preserving declaration order.
    #[must_use]
    pub fn rig_from_options(options: &LightingOptions) -> Vec<Self> {
        options.lights.iter().map(Self::from_options).collect()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &LightState {
        &self.state
    }

    /// Current world-space position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    /// Whether an update function drives this light.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        matches!(self.motion, LightMotion::Dynamic(_))
    }

    /// Advance to the given simulation time. Fixed lights are untouched.
    pub fn update_simulation(&mut self, context: &SimulationContext) {
        if let LightMotion::Dynamic(update) = &mut self.motion {
            update(&mut self.state, context);
        }
    }

    /// Render this light's shadowmap for the current frame.
    ///
    /// A missing shadow target is not fatal: it is logged and the light
    /// falls back to an unshadowed contribution for this frame.
    ///
    /// # Errors
    ///
    /// Any other backend failure, e.g. [`RenderError::NoFrameInProgress`].
    pub fn render_shadowmap<B: RenderBackend + ?Sized>(
        &self,
        slot: usize,
        scene_info: &SceneInfo<'_>,
        backend: &mut B,
    ) -> Result<ShadowMode, RenderError> {
        match backend.render_shadowmap(slot, &self.state, scene_info) {
            Ok(()) => Ok(ShadowMode::Shadowed),
            Err(e @ RenderError::ShadowTargetUnavailable { .. }) => {
                log::warn!("light {slot}: {e}; drawing without shadows");
                Ok(ShadowMode::Unshadowed)
            }
            Err(e) => Err(e),
        }
    }

    /// Accumulate this light's diffuse and specular contribution.
    ///
    /// # Errors
    ///
    /// Propagates [`RenderError::NoFrameInProgress`] from the backend.
    pub fn draw_phong_contribution<B: RenderBackend + ?Sized>(
        &self,
        slot: usize,
        scene_info: &SceneInfo<'_>,
        shadow: ShadowMode,
        backend: &mut B,
    ) -> Result<(), RenderError> {
        backend.draw_phong(slot, &self.state, scene_info, shadow)
    }
}

/// Update function tracing a circle in the plane `x = center.x`.
fn orbit_update(
    path: OrbitPath,
) -> impl FnMut(&mut LightState, &SimulationContext) + Send + 'static {
    let center = Vec3::from_array(path.center);
    move |light, context| {
        let angle = context.sim_time * f64::from(path.angular_speed);
        let radius = f64::from(path.radius);
        light.position = center
            + Vec3::new(
                0.0,
                (angle.sin() * radius) as f32,
                (angle.cos() * radius) as f32,
            );
    }
}
