//! Drawable actors, their meshes, and the ambient base pass.
//!
//! The scene owns every mesh and actor for the session. Actors reference
//! meshes by [`MeshId`]; several actors may share one mesh. Per frame the
//! engine pushes the simulation time in with [`Scene::update_simulation`]
//! and then asks for the ambient pass through [`Scene::render_ambient`].

mod actor;
mod mesh;
pub mod obj;

use std::collections::HashMap;

pub use actor::{Actor, ActorMotion, MeshId};
pub use mesh::{Mesh, MeshVertex, MAX_SPHERE_SUBDIVISIONS};

use crate::assets::{AssetError, Resources};
use crate::error::RenderError;
use crate::lighting::SimulationContext;
use crate::options::SceneOptions;
use crate::renderer::{RenderBackend, SceneInfo};

/// The set of drawables.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
    actors: Vec<Actor>,
}

impl Scene {
    /// A scene over already-built meshes and actors.
    #[must_use]
    pub fn new(meshes: Vec<Mesh>, actors: Vec<Actor>) -> Self {
        Self { meshes, actors }
    }

    /// Place the declared actors, resolving mesh keys against the loaded
    /// resources. Only meshes that some actor uses are kept.
    ///
    /// # Errors
    ///
    /// [`AssetError::Missing`] if an actor names a mesh that was not loaded.
    pub fn from_options(
        options: &SceneOptions,
        resources: &Resources,
    ) -> Result<Self, AssetError> {
        let mut meshes = Vec::new();
        let mut ids: HashMap<&str, MeshId> = HashMap::new();
        let mut actors = Vec::with_capacity(options.actors.len());

        for actor in &options.actors {
            let id = match ids.get(actor.mesh.as_str()) {
                Some(&id) => id,
                None => {
                    let mesh = resources
                        .mesh(&actor.mesh)
                        .ok_or_else(|| AssetError::Missing(actor.mesh.clone()))?;
                    let id = MeshId(meshes.len());
                    meshes.push(mesh.clone());
                    let _ = ids.insert(actor.mesh.as_str(), id);
                    id
                }
            };
            log::debug!("actor {:?} uses mesh {:?}", actor.name, actor.mesh);
            actors.push(Actor::from_options(actor, id));
        }

        Ok(Self { meshes, actors })
    }

    /// Mesh table, indexed by [`MeshId`].
    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Mesh for `id`, if it is in range.
    #[must_use]
    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    /// Actors in draw order.
    #[must_use]
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Recompute every actor's model matrix for the given time.
    pub fn update_simulation(&mut self, context: &SimulationContext) {
        for actor in &mut self.actors {
            actor.update_simulation(context);
        }
    }

    /// Draw every actor with ambient-only shading, writing depth.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn render_ambient<B: RenderBackend + ?Sized>(
        &self,
        info: &SceneInfo<'_>,
        backend: &mut B,
    ) -> Result<(), RenderError> {
        backend.draw_ambient(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ActorOptions;

    fn actor(name: &str, mesh: &str) -> ActorOptions {
        ActorOptions {
            name: name.into(),
            mesh: mesh.into(),
            translation: [0.0; 3],
            scale: 1.0,
            spin: None,
        }
    }

    #[test]
    fn shared_meshes_are_stored_once() {
        let mut resources = Resources::default();
        resources.insert_mesh("ball", Mesh::uv_sphere(4, [1.0; 3]));
        let options = SceneOptions {
            meshes: Vec::new(),
            actors: vec![actor("a", "ball"), actor("b", "ball")],
        };
        let scene = Scene::from_options(&options, &resources).unwrap();
        assert_eq!(scene.meshes().len(), 1);
        assert_eq!(scene.actors()[1].mesh(), MeshId(0));
        assert!(scene.mesh(MeshId(0)).is_some());
    }

    #[test]
    fn unknown_mesh_is_missing() {
        let options = SceneOptions {
            meshes: Vec::new(),
            actors: vec![actor("a", "nope")],
        };
        let err = Scene::from_options(&options, &Resources::default())
            .unwrap_err();
        assert!(matches!(err, AssetError::Missing(key) if key == "nope"));
    }

    #[test]
    fn ambient_pass_reaches_backend_once() {
        use crate::renderer::testing::{Call, RecordingBackend};

        let scene = Scene::new(
            vec![Mesh::uv_sphere(4, [1.0; 3])],
            vec![Actor::new(
                "a",
                MeshId(0),
                glam::Mat4::IDENTITY,
                ActorMotion::Static,
            )],
        );
        let info = SceneInfo::for_tests(scene.actors());
        let mut backend = RecordingBackend::default();
        backend.begin_frame(&info, [0.0; 4]).unwrap();
        scene.render_ambient(&info, &mut backend).unwrap();
        assert_eq!(backend.calls[1], Call::Ambient { actors: 1 });
    }
}
