use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Orbit distance at `distance_factor == 1`.
    pub base_distance: f32,
    /// Radians of orbit per pixel of drag.
    pub rotate_speed: f32,
    /// World units of pan per pixel of drag.
    pub pan_speed: f32,
    /// Distance multiplier applied per wheel step (> 1).
    pub zoom_ratio: f32,
    /// Starting azimuth in degrees.
    pub initial_azimuth_deg: f32,
    /// Starting elevation in degrees.
    pub initial_elevation_deg: f32,
    /// Starting distance factor.
    pub initial_distance_factor: f32,
    /// Starting orbit target.
    pub initial_target: [f32; 3],
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 60.0,
            znear: 0.01,
            zfar: 100.0,
            base_distance: 15.0,
            rotate_speed: 0.005,
            pan_speed: 0.01,
            zoom_ratio: 1.08,
            initial_azimuth_deg: 36.0,
            initial_elevation_deg: -30.0,
            initial_distance_factor: 1.0,
            initial_target: [0.0; 3],
        }
    }
}
