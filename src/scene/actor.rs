use glam::{Mat4, Quat, Vec3};

use crate::lighting::SimulationContext;
use crate::options::ActorOptions;

/// Index of a mesh in the [`Scene`](super::Scene) mesh table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

/// How an actor moves with simulation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActorMotion {
    /// Keeps its base transform.
    Static,
    /// Rotates about `axis` (through the actor origin) at `rate` rad/s.
    Spin {
        /// Unit rotation axis.
        axis: Vec3,
        /// Radians per simulated second.
        rate: f32,
    },
}

/// A drawable instance of a mesh.
#[derive(Debug, Clone)]
pub struct Actor {
    name: String,
    mesh: MeshId,
    base_transform: Mat4,
    motion: ActorMotion,
    model_matrix: Mat4,
}

impl Actor {
    /// Actor drawing `mesh` at `base_transform`, animated by `motion`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mesh: MeshId,
        base_transform: Mat4,
        motion: ActorMotion,
    ) -> Self {
        Self {
            name: name.into(),
            mesh,
            base_transform,
            motion,
            model_matrix: base_transform,
        }
    }

    /// Build from a declarative entry once its mesh has been resolved.
    #[must_use]
    pub fn from_options(options: &ActorOptions, mesh: MeshId) -> Self {
        let base = Mat4::from_scale_rotation_translation(
            Vec3::splat(options.scale),
            Quat::IDENTITY,
            Vec3::from_array(options.translation),
        );
        let motion = match options.spin {
            Some(spin) => ActorMotion::Spin {
                axis: Vec3::from_array(spin.axis)
                    .try_normalize()
                    .unwrap_or(Vec3::Z),
                rate: spin.rate,
            },
            None => ActorMotion::Static,
        };
        Self::new(options.name.clone(), mesh, base, motion)
    }

    /// Display name, unique only by convention.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mesh this actor draws.
    #[must_use]
    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    /// Per-frame animation.
    #[must_use]
    pub fn motion(&self) -> ActorMotion {
        self.motion
    }

    /// Object-to-world transform for the current frame.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        self.model_matrix
    }

    /// Recompute the model matrix for `context.sim_time`.
    pub fn update_simulation(&mut self, context: &SimulationContext) {
        self.model_matrix = match self.motion {
            ActorMotion::Static => self.base_transform,
            ActorMotion::Spin { axis, rate } => {
                let angle = (context.sim_time * f64::from(rate)) as f32;
                self.base_transform * Mat4::from_axis_angle(axis, angle)
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn static_actor_keeps_base_transform() {
        let base = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let mut actor = Actor::new("a", MeshId(0), base, ActorMotion::Static);
        actor.update_simulation(&SimulationContext { sim_time: 50.0 });
        assert_eq!(actor.model_matrix(), base);
    }

    #[test]
    fn spin_rotates_about_own_origin() {
        let mut actor = Actor::new(
            "wheel",
            MeshId(1),
            Mat4::from_translation(Vec3::new(0.0, 0.0, 2.5)),
            ActorMotion::Spin {
                axis: Vec3::Z,
                rate: FRAC_PI_2,
            },
        );
        actor.update_simulation(&SimulationContext { sim_time: 1.0 });
        let p = actor.model_matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 1.0, 2.5), 1e-5), "{p:?}");
    }

    #[test]
    fn from_options_normalizes_axis() {
        let options = ActorOptions {
            name: "w".into(),
            mesh: "m".into(),
            translation: [0.0; 3],
            scale: 2.0,
            spin: Some(crate::options::SpinOptions {
                axis: [0.0, 0.0, 3.0],
                rate: 1.0,
            }),
        };
        let actor = Actor::from_options(&options, MeshId(4));
        assert_eq!(
            actor.motion(),
            ActorMotion::Spin {
                axis: Vec3::Z,
                rate: 1.0
            }
        );
        assert_eq!(actor.mesh(), MeshId(4));
        assert_eq!(
            actor.model_matrix().transform_point3(Vec3::ONE),
            Vec3::splat(2.0)
        );
    }
}
