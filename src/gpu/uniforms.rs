//! CPU mirrors of the WGSL uniform blocks.
//!
//! Field order and padding match `assets/shaders/*.wgsl`; everything is
//! built from 16-byte columns so no manual padding is needed.

use glam::{Mat4, Vec3};

use crate::lighting::LightState;
use crate::renderer::SceneInfo;

/// `Camera` in `common.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Rasterization projection.
    pub projection: [[f32; 4]; 4],
    /// Rasterization view.
    pub view: [[f32; 4]; 4],
    /// True camera view, used for shading.
    pub scene_view: [[f32; 4]; 4],
    /// Ambient color; `w` is unused.
    pub ambient: [f32; 4],
}

impl CameraUniform {
    /// Camera block for the frame described by `info`.
    #[must_use]
    pub fn from_scene_info(info: &SceneInfo<'_>) -> Self {
        Self {
            projection: info.projection_matrix.to_cols_array_2d(),
            view: info.view_matrix.to_cols_array_2d(),
            scene_view: info.scene_view_matrix.to_cols_array_2d(),
            ambient: info.ambient_light_color.extend(1.0).to_array(),
        }
    }
}

/// `Actor` in `common.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ActorUniform {
    /// Object-to-world transform.
    pub model: [[f32; 4]; 4],
    /// See [`normal_matrix`].
    pub normal_matrix: [[f32; 4]; 4],
}

impl ActorUniform {
    /// Actor block for `model`.
    #[must_use]
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix(model).to_cols_array_2d(),
        }
    }
}

/// Inverse-transpose of `model`; identity when `model` is singular.
#[must_use]
pub fn normal_matrix(model: Mat4) -> Mat4 {
    if model.determinant().abs() <= f32::EPSILON {
        Mat4::IDENTITY
    } else {
        model.inverse().transpose()
    }
}

/// `ShadowFace` in `shadowmap_gen.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowFaceUniform {
    /// View-projection of one cube face.
    pub view_projection: [[f32; 4]; 4],
    /// World-space light position, `w = 1`.
    pub light_position: [f32; 4],
}

impl ShadowFaceUniform {
    /// Face block for a light at `light_position`.
    #[must_use]
    pub fn new(view_projection: Mat4, light_position: Vec3) -> Self {
        Self {
            view_projection: view_projection.to_cols_array_2d(),
            light_position: light_position.extend(1.0).to_array(),
        }
    }
}

/// `PointLight` in `phong_shadow.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    /// World-space position, `w = 1`.
    pub position: [f32; 4],
    /// Color in `xyz`, intensity in `w`.
    pub color: [f32; 4],
    /// Shininess, specular strength, shadow bias and a shadowed flag.
    pub params: [f32; 4],
}

/// Material and shadow-test constants shared by every light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongParams {
    /// Phong exponent.
    pub shininess: f32,
    /// Scale of the specular term.
    pub specular_strength: f32,
    /// Relative tolerance of the distance comparison.
    pub shadow_bias: f32,
}

impl PointLightUniform {
    /// Light block; `shadowed` selects whether the cube is sampled.
    #[must_use]
    pub fn new(light: &LightState, params: PhongParams, shadowed: bool) -> Self {
        Self {
            position: light.position.extend(1.0).to_array(),
            color: light.color.extend(light.intensity).to_array(),
            params: [
                params.shininess,
                params.specular_strength,
                params.shadow_bias,
                if shadowed { 1.0 } else { 0.0 },
            ],
        }
    }
}
