use std::collections::BTreeMap;
use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::obj::{self, ObjParseError};

/// Upper bound on [`Mesh::uv_sphere`] subdivisions. Keeps vertex and index
/// counts well inside `u32`.
pub const MAX_SPHERE_SUBDIVISIONS: u32 = 1024;

/// Vertex layout shared by every pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space unit normal.
    pub normal: [f32; 3],
    /// Base color baked from the material palette.
    pub color: [f32; 3],
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices, three per face.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Parse Wavefront OBJ text, coloring faces by their `usemtl` material.
    ///
    /// # Errors
    ///
    /// Malformed numbers or out-of-range indices, with the offending line.
    pub fn from_obj(
        text: &str,
        palette: &BTreeMap<String, [f32; 3]>,
    ) -> Result<Self, ObjParseError> {
        obj::parse(text, palette)
    }

    /// Unit-radius UV sphere around the origin with `subdivisions` rings and
    /// twice as many segments. Poles lie on the Z axis.
    ///
    /// `subdivisions` is clamped to `2..=`[`MAX_SPHERE_SUBDIVISIONS`].
    #[must_use]
    pub fn uv_sphere(subdivisions: u32, color: [f32; 3]) -> Self {
        let rings = sphere_rings(subdivisions);
        if rings < subdivisions {
            log::warn!("uv sphere: {subdivisions} subdivisions clamped to {rings}");
        }
        let segments = rings * 2;

        let mut vertices =
            Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
        for ring in 0..=rings {
            let theta = PI * ring as f32 / rings as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            for segment in 0..=segments {
                let phi = TAU * segment as f32 / segments as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();
                let p =
                    Vec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta);
                vertices.push(MeshVertex {
                    position: p.to_array(),
                    normal: p.to_array(),
                    color,
                });
            }
        }

        let stride = segments + 1;
        let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
        for ring in 0..rings {
            for segment in 0..segments {
                let a = ring * stride + segment;
                let b = a + stride;
                if ring != 0 {
                    indices.extend_from_slice(&[a, b, a + 1]);
                }
                if ring != rings - 1 {
                    indices.extend_from_slice(&[a + 1, b, b + 1]);
                }
            }
        }

        Self { vertices, indices }
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

fn sphere_rings(subdivisions: u32) -> u32 {
    subdivisions.clamp(2, MAX_SPHERE_SUBDIVISIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_subdivisions_are_clamped() {
        assert_eq!(sphere_rings(0), 2);
        assert_eq!(sphere_rings(24), 24);
        assert_eq!(sphere_rings(u32::MAX), MAX_SPHERE_SUBDIVISIONS);

        let rings = u64::from(sphere_rings(u32::MAX));
        let vertices = (rings + 1) * (2 * rings + 1);
        let indices = rings * 2 * rings * 6;
        assert!(vertices <= u64::from(u32::MAX));
        assert!(indices <= u64::from(u32::MAX));
    }

    #[test]
    fn undersized_sphere_request_uses_minimum_rings() {
        let mesh = Mesh::uv_sphere(1, [1.0; 3]);
        assert_eq!(mesh.vertices.len(), 3 * 5);
        assert_eq!(mesh.triangle_count(), 2 * 4 * 2 - 2 * 4);
    }

    #[test]
    fn sphere_vertices_lie_on_unit_sphere() {
        let mesh = Mesh::uv_sphere(8, [1.0, 0.0, 0.0]);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert_eq!(v.normal, v.position);
            assert_eq!(v.color, [1.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn sphere_indices_are_in_range() {
        let mesh = Mesh::uv_sphere(6, [0.5; 3]);
        let n = mesh.vertices.len() as u32;
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh.indices.iter().all(|&i| i < n));
        // Pole rings contribute one triangle per segment, others two.
        assert_eq!(mesh.triangle_count(), (6 * 12 * 2 - 2 * 12) as usize);
    }

    #[test]
    fn sphere_triangles_face_outward() {
        let mesh = Mesh::uv_sphere(10, [0.5; 3]);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }
}
