use glam::Mat4;

use crate::options::CameraOptions;

/// Perspective projection with a fixed vertical field of view and clip
/// planes. Only the aspect ratio changes from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fovy: 60.0,
            znear: 0.01,
            zfar: 100.0,
        }
    }
}

impl Projection {
    /// Projection parameters taken from camera options.
    #[must_use]
    pub fn from_options(options: &CameraOptions) -> Self {
        Self {
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        }
    }

    /// Viewport aspect ratio; a degenerate viewport falls back to square.
    #[must_use]
    pub fn aspect(width: u32, height: u32) -> f32 {
        if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }

    /// Build the projection matrix for a viewport.
    #[must_use]
    pub fn matrix(&self, width: u32, height: u32) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            Self::aspect(width, height),
            self.znear,
            self.zfar,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_height_falls_back_to_square() {
        assert_eq!(Projection::aspect(800, 0), 1.0);
        assert_eq!(Projection::aspect(0, 600), 1.0);
        assert_eq!(Projection::aspect(800, 400), 2.0);
    }

    #[test]
    fn matrix_uses_configured_fov() {
        let p = Projection::default();
        let m = p.matrix(640, 640);
        // m[1][1] = 1 / tan(fovy / 2)
        let expected = 1.0 / (30.0_f32.to_radians()).tan();
        assert!((m.y_axis.y - expected).abs() < 1e-5);
        assert!((m.x_axis.x - expected).abs() < 1e-5);
    }
}
