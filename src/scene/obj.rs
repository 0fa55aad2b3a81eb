//! Minimal Wavefront OBJ reader.
//!
//! Handles positions, normals and polygonal faces in the `v`, `v/t`,
//! `v//n` and `v/t/n` forms, with 1-based or negative (relative) indices.
//! Polygons are fan-triangulated. `usemtl` picks the base color of the
//! following faces from a caller-supplied palette. Everything else
//! (`vt`, `o`, `g`, `s`, `mtllib`) is skipped.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;

use super::mesh::{Mesh, MeshVertex};

/// Color of faces whose material is not in the palette.
pub const FALLBACK_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

/// A malformed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjParseError {
    /// 1-based line number.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for ObjParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ObjParseError {}

struct Corner {
    position: usize,
    normal: Option<usize>,
}

pub(super) fn parse(
    text: &str,
    palette: &BTreeMap<String, [f32; 3]>,
) -> Result<Mesh, ObjParseError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut color = FALLBACK_COLOR;
    let mut mesh = Mesh::default();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let err = |message: String| ObjParseError {
            line: line_no,
            message,
        };

        let line = raw.split('#').next().unwrap_or_default().trim();
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword {
            "v" => positions.push(parse_vec3(&mut parts).map_err(err)?),
            "vn" => normals.push(parse_vec3(&mut parts).map_err(err)?),
            "usemtl" => {
                let name = parts.next().unwrap_or_default();
                color = palette.get(name).copied().unwrap_or(FALLBACK_COLOR);
            }
            "f" => {
                let corners = parts
                    .map(|token| {
                        parse_corner(token, positions.len(), normals.len())
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(err)?;
                if corners.len() < 3 {
                    return Err(err(format!(
                        "face needs at least 3 vertices, got {}",
                        corners.len()
                    )));
                }
                push_face(&mut mesh, &corners, &positions, &normals, color);
            }
            _ => {}
        }
    }

    Ok(mesh)
}

fn parse_vec3<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
) -> Result<Vec3, String> {
    let mut xyz = [0.0_f32; 3];
    for (axis, slot) in xyz.iter_mut().enumerate() {
        let token = parts
            .next()
            .ok_or_else(|| format!("missing component {axis}"))?;
        *slot = token
            .parse()
            .map_err(|_| format!("invalid number {token:?}"))?;
    }
    Ok(Vec3::from_array(xyz))
}

/// Resolve a 1-based or negative OBJ index against `len` elements.
fn resolve_index(token: &str, len: usize) -> Result<usize, String> {
    let index: i64 = token
        .parse()
        .map_err(|_| format!("invalid index {token:?}"))?;
    let resolved = match index {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => usize::try_from(len as i64 + i).ok(),
    };
    resolved
        .filter(|&r| r < len)
        .ok_or_else(|| format!("index {index} out of range ({len} defined)"))
}

fn parse_corner(
    token: &str,
    position_count: usize,
    normal_count: usize,
) -> Result<Corner, String> {
    let mut fields = token.split('/');
    let position =
        resolve_index(fields.next().unwrap_or_default(), position_count)?;
    let _texcoord = fields.next();
    let normal = match fields.next() {
        Some(n) if !n.is_empty() => Some(resolve_index(n, normal_count)?),
        _ => None,
    };
    Ok(Corner { position, normal })
}

fn push_face(
    mesh: &mut Mesh,
    corners: &[Corner],
    positions: &[Vec3],
    normals: &[Vec3],
    color: [f32; 3],
) {
    let p0 = positions[corners[0].position];
    let p1 = positions[corners[1].position];
    let p2 = positions[corners[2].position];
    let face_normal = (p1 - p0).cross(p2 - p0).try_normalize().unwrap_or(Vec3::Z);

    let base = mesh.vertices.len() as u32;
    for corner in corners {
        let normal = corner.normal.map_or(face_normal, |n| normals[n]);
        mesh.vertices.push(MeshVertex {
            position: positions[corner.position].to_array(),
            normal: normal.to_array(),
            color,
        });
    }
    for k in 1..(corners.len() as u32 - 1) {
        mesh.indices.extend_from_slice(&[base, base + k, base + k + 1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> BTreeMap<String, [f32; 3]> {
        BTreeMap::from([("red".to_owned(), [1.0, 0.0, 0.0])])
    }

    #[test]
    fn quad_is_fan_triangulated() {
        let text = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let mesh = Mesh::from_obj(text, &palette()).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.color, FALLBACK_COLOR);
        }
    }

    #[test]
    fn materials_pick_palette_colors() {
        let text = "\
mtllib scene.mtl
v 0 0 0
v 1 0 0
v 0 1 0
usemtl red
f 1 2 3
usemtl unknown
f 1 2 3
";
        let mesh = Mesh::from_obj(text, &palette()).unwrap();
        assert_eq!(mesh.vertices[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[3].color, FALLBACK_COLOR);
    }

    #[test]
    fn explicit_normals_and_negative_indices() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vn 0 0 -1
f -3/1/1 -2/1/-1 -1//1 # trailing comment
";
        let mesh = Mesh::from_obj(text, &palette()).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, -1.0]));
    }

    #[test]
    fn out_of_range_index_reports_line() {
        let text = "v 0 0 0\nv 1 0 0\nf 1 2 3\n";
        let err = Mesh::from_obj(text, &palette()).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("out of range"), "{}", err.message);
    }

    #[test]
    fn bad_number_reports_line() {
        let err = Mesh::from_obj("v 0 zero 0\n", &palette()).unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn degenerate_face_gets_fallback_normal() {
        let text = "v 0 0 0\nv 0 0 0\nv 0 0 0\nf 1 2 3\n";
        let mesh = Mesh::from_obj(text, &palette()).unwrap();
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }
}
