use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Lighting rig and shading parameters.
pub struct LightingOptions {
    /// Color used by the ambient pass.
    pub ambient_color: [f32; 3],
    /// Specular shininess exponent.
    pub shininess: f32,
    /// Specular reflectance (grey).
    pub specular_strength: f32,
    /// Edge length of each shadow cubemap face, in texels.
    pub shadow_map_size: u32,
    /// Relative tolerance of the shadow depth comparison.
    pub shadow_bias: f32,
    /// Far plane of the shadow cubemap projection.
    pub shadow_far: f32,
    /// Declared lights, rendered in this order.
    pub lights: Vec<LightOptions>,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient_color: [0.5, 0.5, 0.5],
            shininess: 12.0,
            specular_strength: 0.4,
            shadow_map_size: 512,
            shadow_bias: 0.01,
            shadow_far: 100.0,
            lights: vec![
                LightOptions {
                    position: None,
                    orbit: Some(OrbitPath {
                        center: [0.1, 0.0, 0.0],
                        radius: 12.0,
                        angular_speed: 0.5,
                    }),
                    color: [1.0, 1.0, 1.0],
                    intensity: 20.0,
                },
                LightOptions {
                    position: Some([0.1, -4.0, 5.0]),
                    orbit: None,
                    color: [1.0, 1.0, 1.0],
                    intensity: 20.0,
                },
                LightOptions {
                    position: Some([0.1, -0.1, -7.0]),
                    orbit: None,
                    color: [0.9, 0.9, 0.9],
                    intensity: 15.0,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One entry of the declarative light list.
///
/// `orbit` takes precedence over `position`; when both are present the
/// position is only the value seen before the first simulation update.
pub struct LightOptions {
    /// Fixed world-space position.
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    /// Time-driven circular path.
    #[serde(default)]
    pub orbit: Option<OrbitPath>,
    /// Linear RGB color.
    #[serde(default = "white")]
    pub color: [f32; 3],
    /// Scalar intensity.
    #[serde(default = "unit")]
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Circle in the plane `x = center.x`:
/// `center + (0, radius * sin(w t), radius * cos(w t))`.
pub struct OrbitPath {
    /// Circle center.
    pub center: [f32; 3],
    /// Circle radius.
    pub radius: f32,
    /// Angular speed in radians per simulated second.
    pub angular_speed: f32,
}

const fn white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

const fn unit() -> f32 {
    1.0
}
