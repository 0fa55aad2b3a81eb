//! Per-light distance cubemaps.
//!
//! Each face is rendered with a 90° perspective looking down one axis.
//! Face order and orientation follow the cube sampling convention shared
//! by every wgpu backend (+X, −X, +Y, −Y, +Z, −Z), so a fragment can look
//! its occluder distance up with the raw light-to-fragment vector.

use glam::{Mat4, Vec3};

/// Color format of the cubemap: one float of distance per texel.
pub const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;

/// Near plane of the face projections.
pub const SHADOW_NEAR: f32 = 0.05;

/// Forward and up vector of each cube face.
const FACES: [(Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Y),
    (Vec3::NEG_X, Vec3::NEG_Y),
    (Vec3::Y, Vec3::Z),
    (Vec3::NEG_Y, Vec3::NEG_Z),
    (Vec3::Z, Vec3::NEG_Y),
    (Vec3::NEG_Z, Vec3::NEG_Y),
];

/// View-projection of every face for a light at `light_position`.
///
/// The projection is flipped in Y: cube texel rows grow downward with the
/// `t` coordinate of the sampling convention, while clip-space Y points
/// up. The flip reverses winding, so shadow pipelines do not cull.
#[must_use]
pub fn face_view_projections(light_position: Vec3, far: f32) -> [Mat4; 6] {
    let projection = Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0))
        * Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, SHADOW_NEAR, far);
    FACES.map(|(forward, up)| {
        projection
            * Mat4::look_at_rh(light_position, light_position + forward, up)
    })
}

/// The cubemap of one light: six renderable face views and one cube view
/// for sampling.
pub struct ShadowCube {
    /// Cube texture, 6 layers.
    pub texture: wgpu::Texture,
    /// One 2D view per layer, in face order.
    pub face_views: [wgpu::TextureView; 6],
    /// Cube view for sampling.
    pub cube_view: wgpu::TextureView,
}

impl ShadowCube {
    /// Allocate a `size` x `size` cube.
    #[must_use]
    pub fn new(device: &wgpu::Device, label: &str, size: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.max(1),
                height: size.max(1),
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let face_views = std::array::from_fn(|layer| {
            texture.create_view(&wgpu::TextureViewDescriptor {
                label: Some(label),
                dimension: Some(wgpu::TextureViewDimension::D2),
                base_array_layer: layer as u32,
                array_layer_count: Some(1),
                ..Default::default()
            })
        });
        let cube_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        Self {
            texture,
            face_views,
            cube_view,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4Swizzles;

    use super::*;

    fn ndc(m: Mat4, p: Vec3) -> Vec3 {
        let clip = m * p.extend(1.0);
        clip.xyz() / clip.w
    }

    /// Where the cube sampling convention puts direction `d` on its major
    /// face, as NDC (x right, y up).
    fn expected_ndc(d: Vec3) -> (usize, f32, f32) {
        let a = d.abs();
        let (face, sc, tc, ma) = if a.x >= a.y && a.x >= a.z {
            if d.x > 0.0 { (0, -d.z, -d.y, a.x) } else { (1, d.z, -d.y, a.x) }
        } else if a.y >= a.z {
            if d.y > 0.0 { (2, d.x, d.z, a.y) } else { (3, d.x, -d.z, a.y) }
        } else if d.z > 0.0 {
            (4, d.x, -d.y, a.z)
        } else {
            (5, -d.x, -d.y, a.z)
        };
        // s maps to +x, t maps to texel rows, i.e. −y.
        (face, sc / ma, -tc / ma)
    }

    #[test]
    fn faces_match_cube_sampling_convention() {
        let light = Vec3::new(0.1, -4.0, 5.0);
        let faces = face_view_projections(light, 100.0);
        let dirs = [
            Vec3::new(5.0, 1.0, -2.0),
            Vec3::new(-5.0, 2.0, 1.0),
            Vec3::new(1.0, 6.0, -2.0),
            Vec3::new(-2.0, -6.0, 1.5),
            Vec3::new(1.0, -2.0, 7.0),
            Vec3::new(-3.0, 1.0, -7.0),
        ];
        for d in dirs {
            let (face, x, y) = expected_ndc(d);
            let got = ndc(faces[face], light + d);
            assert!(
                (got.x - x).abs() < 1e-4 && (got.y - y).abs() < 1e-4,
                "dir {d:?} face {face}: got {got:?}, want ({x}, {y})"
            );
            assert!((0.0..=1.0).contains(&got.z));
        }
    }
}
