use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Meshes to load at startup and the actors that draw them.
pub struct SceneOptions {
    /// Mesh sources, fetched concurrently before the frame loop starts.
    pub meshes: Vec<MeshOptions>,
    /// Actors placed in the scene, drawn in this order.
    pub actors: Vec<ActorOptions>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            meshes: vec![
                MeshOptions::Obj {
                    key: "terrain".into(),
                    path: "meshes/shadow_scene__terrain.obj".into(),
                    palette: BTreeMap::from([
                        ("mat_architecture".into(), [0.79, 0.41, 0.31]),
                        ("mat_terrain".into(), [0.9, 0.7, 0.4]),
                        ("mat_screen".into(), [0.31, 0.84, 0.42]),
                    ]),
                },
                MeshOptions::Obj {
                    key: "wheel".into(),
                    path: "meshes/tile_wheel.obj".into(),
                    palette: BTreeMap::from([(
                        "palette".into(),
                        [1.0, 1.0, 1.0],
                    )]),
                },
            ],
            actors: vec![
                ActorOptions {
                    name: "terrain".into(),
                    mesh: "terrain".into(),
                    translation: [0.0; 3],
                    scale: 1.0,
                    spin: None,
                },
                ActorOptions {
                    name: "wheel".into(),
                    mesh: "wheel".into(),
                    translation: [0.0, 0.0, 2.5],
                    scale: 1.0,
                    spin: Some(SpinOptions {
                        axis: [0.0, 0.0, 1.0],
                        rate: 0.4,
                    }),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Where a mesh comes from.
pub enum MeshOptions {
    /// Wavefront OBJ file relative to the assets root.
    Obj {
        /// Lookup key used by actors.
        key: String,
        /// Path relative to the assets root.
        path: String,
        /// Material name → base color.
        #[serde(default)]
        palette: BTreeMap<String, [f32; 3]>,
    },
    /// Procedurally generated UV sphere of radius 1.
    UvSphere {
        /// Lookup key used by actors.
        key: String,
        /// Latitude/longitude subdivisions, clamped to
        /// [`MAX_SPHERE_SUBDIVISIONS`](crate::scene::MAX_SPHERE_SUBDIVISIONS).
        subdivisions: u32,
        /// Base color.
        color: [f32; 3],
    },
}

impl MeshOptions {
    /// Lookup key of this mesh.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Obj { key, .. } | Self::UvSphere { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A drawable placed in the scene.
pub struct ActorOptions {
    /// Display name, used in logs.
    pub name: String,
    /// Key of the mesh this actor draws.
    pub mesh: String,
    /// World-space translation.
    #[serde(default)]
    pub translation: [f32; 3],
    /// Uniform scale.
    #[serde(default = "unit")]
    pub scale: f32,
    /// Optional rotation driven by simulation time.
    #[serde(default)]
    pub spin: Option<SpinOptions>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Constant-rate rotation about an axis through the actor origin.
pub struct SpinOptions {
    /// Rotation axis (normalized on use).
    pub axis: [f32; 3],
    /// Radians per simulated second.
    pub rate: f32,
}

const fn unit() -> f32 {
    1.0
}
