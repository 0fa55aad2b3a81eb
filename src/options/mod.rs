//! Centralized renderer options with TOML support.
//!
//! All tweakable settings (camera, lighting rig, scene content, display,
//! asset locations, keybindings, debug toggles) are consolidated here.
//! Every section uses `#[serde(default)]` so a partial TOML file (e.g. one
//! that only overrides `[lighting]`) fills the rest from defaults.

mod assets;
mod camera;
mod debug;
mod display;
mod lighting;
mod scene;

use std::path::Path;

pub use assets::AssetOptions;
pub use camera::CameraOptions;
pub use debug::DebugOptions;
pub use display::DisplayOptions;
pub use lighting::{LightOptions, LightingOptions, OrbitPath};
pub use scene::{ActorOptions, MeshOptions, SceneOptions, SpinOptions};
use serde::{Deserialize, Serialize};

use crate::error::PenumbraError;
use crate::input::KeyBindings;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Lighting rig and shading parameters.
    pub lighting: LightingOptions,
    /// Meshes and actors.
    pub scene: SceneOptions,
    /// Background color and frame limiting.
    pub display: DisplayOptions,
    /// Shader source locations.
    pub assets: AssetOptions,
    /// Keyboard binding options.
    pub keybindings: KeyBindings,
    /// Debug visualization options.
    pub debug: DebugOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PenumbraError::Io`] if the file cannot be read and
    /// [`PenumbraError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, PenumbraError> {
        let content =
            std::fs::read_to_string(path).map_err(PenumbraError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PenumbraError::OptionsParse`] on malformed input.
    pub fn from_toml(content: &str) -> Result<Self, PenumbraError> {
        toml::from_str(content)
            .map_err(|e| PenumbraError::OptionsParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::command::EngineCommand;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[lighting]
shininess = 80.0
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.lighting.shininess, 80.0);
        // Everything else should be default
        assert_eq!(opts.lighting.ambient_color, [0.5, 0.5, 0.5]);
        assert_eq!(opts.lighting.lights.len(), 3);
        assert_eq!(opts.camera.fovy, 60.0);
        assert_eq!(opts.display.background, [0.0, 0.65, 1.0, 1.0]);
    }

    #[test]
    fn light_list_parses() {
        let toml_str = r"
[[lighting.lights]]
orbit = { center = [0.0, 0.0, 2.0], radius = 3.0, angular_speed = 1.0 }
intensity = 4.0

[[lighting.lights]]
position = [1.0, 2.0, 3.0]
color = [1.0, 0.0, 0.0]
";
        let opts = Options::from_toml(toml_str).unwrap();
        let lights = &opts.lighting.lights;
        assert_eq!(lights.len(), 2);
        assert!(lights[0].orbit.is_some());
        assert_eq!(lights[0].color, [1.0, 1.0, 1.0]);
        assert_eq!(lights[0].intensity, 4.0);
        assert_eq!(lights[1].position, Some([1.0, 2.0, 3.0]));
        assert_eq!(lights[1].intensity, 1.0);
    }

    #[test]
    fn mesh_sources_parse() {
        let toml_str = r#"
[[scene.meshes]]
kind = "uv_sphere"
key = "ball"
subdivisions = 12
color = [0.2, 0.2, 0.9]

[[scene.actors]]
name = "ball"
mesh = "ball"
translation = [0.0, 0.0, 1.0]
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.scene.meshes.len(), 1);
        assert_eq!(opts.scene.meshes[0].key(), "ball");
        assert_eq!(opts.scene.actors[0].scale, 1.0);
        assert!(opts.scene.actors[0].spin.is_none());
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = Options::from_toml("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, PenumbraError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyP"),
            Some(EngineCommand::TogglePause)
        );
        assert_eq!(
            opts.keybindings.lookup("KeyC"),
            Some(EngineCommand::ActivatePresetView)
        );
        assert_eq!(opts.keybindings.lookup("KeyQ"), None);
    }
}
