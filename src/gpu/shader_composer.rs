use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::PenumbraError;

/// Wraps `naga_oil::compose::Composer` to compose pass shaders against the
/// shared `penumbra::common` module.
///
/// Sources are handed in at runtime (they come out of the startup asset
/// load), so every failure is returned instead of panicking. Composition
/// produces `naga::Module` IR directly, skipping a WGSL re-parse in wgpu.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Register the shared module. Its source must start with
    /// `#define_import_path penumbra::common`.
    ///
    /// # Errors
    ///
    /// [`PenumbraError::Shader`] if the module does not parse.
    pub fn new(common_source: &str, file_path: &str) -> Result<Self, PenumbraError> {
        let mut composer = Composer::default();
        let _ = composer
            .add_composable_module(ComposableModuleDescriptor {
                source: common_source,
                file_path,
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })
            .map_err(|e| shader_error(file_path, &e))?;
        Ok(Self { composer })
    }

    /// Compose `source` into a `wgpu::ShaderModule`.
    ///
    /// # Errors
    ///
    /// [`PenumbraError::Shader`] on invalid WGSL, including uses of items
    /// that no registered module defines.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, PenumbraError> {
        let naga_module = self
            .compose_naga(source, file_path)
            .map_err(|e| shader_error(file_path, &e))?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose `source` into naga IR without a device.
    ///
    /// # Errors
    ///
    /// The composer's error, boxed.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, Box<ComposerError>> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

fn shader_error(file_path: &str, e: &ComposerError) -> PenumbraError {
    PenumbraError::Shader(format!("{file_path}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMON: &str = include_str!("../../assets/shaders/common.wgsl");

    fn pass_shaders() -> [(&'static str, &'static str); 3] {
        [
            (
                include_str!("../../assets/shaders/shadowmap_gen.wgsl"),
                "shaders/shadowmap_gen.wgsl",
            ),
            (
                include_str!("../../assets/shaders/ambient_color.wgsl"),
                "shaders/ambient_color.wgsl",
            ),
            (
                include_str!("../../assets/shaders/phong_shadow.wgsl"),
                "shaders/phong_shadow.wgsl",
            ),
        ]
    }

    #[test]
    fn pass_shaders_compose() {
        let mut composer =
            ShaderComposer::new(COMMON, "shaders/common.wgsl").unwrap();
        for (source, file_path) in pass_shaders() {
            let module = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| panic!("{file_path} failed to compose: {e}"));
            let entry_points: Vec<_> =
                module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
            assert!(entry_points.contains(&"vs_main"), "{file_path}");
            assert!(entry_points.contains(&"fs_main"), "{file_path}");
        }
    }

    #[test]
    fn use_of_unknown_import_is_an_error() {
        let mut composer =
            ShaderComposer::new(COMMON, "shaders/common.wgsl").unwrap();
        let source = "#import penumbra::missing::{Thing}\n\
            @fragment\n\
            fn fs_main() -> @location(0) vec4<f32> {\n    return Thing;\n}\n";
        assert!(composer.compose_naga(source, "bad.wgsl").is_err());
    }

    #[test]
    fn invalid_wgsl_is_an_error() {
        let mut composer =
            ShaderComposer::new(COMMON, "shaders/common.wgsl").unwrap();
        let source = "@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return 1.0;\n";
        assert!(composer.compose_naga(source, "bad.wgsl").is_err());
    }
}
