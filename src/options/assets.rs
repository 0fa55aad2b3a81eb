use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Locations of the shader sources, relative to `root`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AssetOptions {
    /// Directory every asset path is resolved against.
    pub root: PathBuf,
    /// Shared WGSL module imported by the pass shaders.
    pub common_shader: String,
    /// Distance-to-light cubemap generation.
    pub shadowmap_shader: String,
    /// Ambient-only base pass.
    pub ambient_shader: String,
    /// Per-light Phong contribution with shadow test.
    pub phong_shader: String,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            common_shader: "shaders/common.wgsl".into(),
            shadowmap_shader: "shaders/shadowmap_gen.wgsl".into(),
            ambient_shader: "shaders/ambient_color.wgsl".into(),
            phong_shader: "shaders/phong_shadow.wgsl".into(),
        }
    }
}
