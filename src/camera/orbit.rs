use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI};

use glam::{Mat2, Mat4, Vec2, Vec3};

use crate::options::CameraOptions;

/// Lower bound of [`CameraState::distance_factor`].
pub const MIN_DISTANCE_FACTOR: f32 = 0.1;
/// Upper bound of [`CameraState::distance_factor`].
pub const MAX_DISTANCE_FACTOR: f32 = 4.0;

/// Orbit parameters. The camera always sits at `(-distance, 0, 0)` and the
/// scene is rotated underneath it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Rotation about the world Z axis, in radians.
    pub angle_azimuth: f32,
    /// Rotation about the world Y axis, in radians.
    pub angle_elevation: f32,
    /// Multiplier on the base orbit distance, kept in `[0.1, 4]`.
    pub distance_factor: f32,
    /// Point the camera looks at.
    pub target: Vec3,
}

impl CameraState {
    /// The canonical composition restored by the preset view.
    pub const PRESET: Self = Self {
        angle_azimuth: -FRAC_PI_2,
        angle_elevation: -FRAC_PI_6,
        distance_factor: 0.8,
        target: Vec3::ZERO,
    };

    /// Copy of `self` with the distance factor clamped into range.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.distance_factor = self
            .distance_factor
            .clamp(MIN_DISTANCE_FACTOR, MAX_DISTANCE_FACTOR);
        self
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            angle_azimuth: PI / 5.0,
            angle_elevation: -PI / 6.0,
            distance_factor: 1.0,
            target: Vec3::ZERO,
        }
    }
}

/// World-to-camera matrix for an orbit state.
///
/// `view = lookAt(eye, target, +Z) * R_y(elevation) * R_z(azimuth)`, with
/// the eye at `(-base_distance * distance_factor, 0, 0)`. The rotation order
/// is part of the orbit behaviour and must not be swapped.
#[must_use]
pub fn compute_view_matrix(state: &CameraState, base_distance: f32) -> Mat4 {
    let distance = base_distance * state.distance_factor;
    let look_at = Mat4::look_at_rh(
        Vec3::new(-distance, 0.0, 0.0),
        state.target,
        Vec3::Z,
    );
    look_at
        * Mat4::from_rotation_y(state.angle_elevation)
        * Mat4::from_rotation_z(state.angle_azimuth)
}

/// Orbit camera controller.
///
/// Every mutation recomputes the world-to-camera matrix before returning,
/// so a frame never observes a state/matrix mismatch.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    state: CameraState,
    base_distance: f32,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_ratio: f32,
    world_to_camera: Mat4,
}

impl OrbitCamera {
    /// Create a camera from options, starting at the configured angles.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        let state = CameraState {
            angle_azimuth: options.initial_azimuth_deg.to_radians(),
            angle_elevation: options.initial_elevation_deg.to_radians(),
            distance_factor: options.initial_distance_factor,
            target: Vec3::from_array(options.initial_target),
        }
        .clamped();
        Self {
            state,
            base_distance: options.base_distance,
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_ratio: options.zoom_ratio.max(1.0),
            world_to_camera: compute_view_matrix(&state, options.base_distance),
        }
    }

    /// Current orbit parameters.
    #[must_use]
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// The world-to-camera (view) matrix for the current state.
    #[must_use]
    pub fn world_to_camera(&self) -> Mat4 {
        self.world_to_camera
    }

    /// Distance from the eye to the orbit pivot.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.base_distance * self.state.distance_factor
    }

    /// Replace the whole state (distance factor is clamped).
    pub fn set_state(&mut self, state: CameraState) {
        self.state = state.clamped();
        self.update_transform();
    }

    /// Orbit by a pointer-drag delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.state.angle_azimuth += delta.x * self.rotate_speed;
        self.state.angle_elevation += -delta.y * self.rotate_speed;
        self.update_transform();
    }

    /// Move the target in the world XY plane by a pointer-drag delta.
    ///
    /// The drag is rotated by `-azimuth` so the pan follows the screen.
    pub fn pan(&mut self, delta: Vec2) {
        let rotation = Mat2::from_angle(-self.state.angle_azimuth);
        let offset = rotation * Vec2::new(delta.y, delta.x) * -self.pan_speed;
        self.state.target.x += offset.x;
        self.state.target.y += offset.y;
        self.update_transform();
    }

    /// Zoom by one wheel step. Positive scroll moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        if scroll == 0.0 || scroll.is_nan() {
            return;
        }
        let factor = if scroll > 0.0 {
            1.0 / self.zoom_ratio
        } else {
            self.zoom_ratio
        };
        self.state.distance_factor = (self.state.distance_factor * factor)
            .clamp(MIN_DISTANCE_FACTOR, MAX_DISTANCE_FACTOR);
        self.update_transform();
    }

    /// Jump to [`CameraState::PRESET`].
    pub fn apply_preset(&mut self) {
        self.state = CameraState::PRESET;
        self.update_transform();
    }

    fn update_transform(&mut self) {
        self.world_to_camera =
            compute_view_matrix(&self.state, self.base_distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(&CameraOptions::default())
    }

    #[test]
    fn zoom_stays_in_range() {
        let mut cam = camera();
        for _ in 0..200 {
            cam.zoom(-3.0);
        }
        assert_eq!(cam.state().distance_factor, MAX_DISTANCE_FACTOR);
        for _ in 0..200 {
            cam.zoom(1e6);
        }
        assert_eq!(cam.state().distance_factor, MIN_DISTANCE_FACTOR);
    }

    #[test]
    fn zoom_steps_by_ratio() {
        let mut cam = camera();
        cam.zoom(1.0);
        assert!((cam.state().distance_factor - 1.0 / 1.08).abs() < 1e-6);
        cam.zoom(-1.0);
        cam.zoom(-1.0);
        assert!((cam.state().distance_factor - 1.08).abs() < 1e-5);
    }

    #[test]
    fn zero_scroll_is_ignored() {
        let mut cam = camera();
        let before = *cam.state();
        cam.zoom(0.0);
        assert_eq!(*cam.state(), before);
    }

    #[test]
    fn view_matrix_is_pure() {
        let state = CameraState {
            angle_azimuth: 0.3,
            angle_elevation: -0.7,
            distance_factor: 1.7,
            target: Vec3::new(1.0, -2.0, 0.5),
        };
        let a = compute_view_matrix(&state, 15.0);
        let b = compute_view_matrix(&state, 15.0);
        assert_eq!(a.to_cols_array(), b.to_cols_array());
    }

    #[test]
    fn set_state_matches_free_function() {
        let mut cam = camera();
        let state = CameraState {
            angle_azimuth: 1.1,
            angle_elevation: 0.2,
            distance_factor: 2.5,
            target: Vec3::new(0.0, 3.0, 0.0),
        };
        cam.set_state(state);
        assert_eq!(
            cam.world_to_camera().to_cols_array(),
            compute_view_matrix(&state, 15.0).to_cols_array()
        );
    }

    #[test]
    fn set_state_clamps_distance() {
        let mut cam = camera();
        cam.set_state(CameraState {
            distance_factor: 0.0,
            ..CameraState::default()
        });
        assert_eq!(cam.state().distance_factor, MIN_DISTANCE_FACTOR);
    }

    #[test]
    fn untransformed_origin_sits_in_front_of_eye() {
        let state = CameraState {
            angle_azimuth: 0.0,
            angle_elevation: 0.0,
            distance_factor: 1.0,
            target: Vec3::ZERO,
        };
        let view = compute_view_matrix(&state, 10.0);
        let p = view.transform_point3(Vec3::ZERO);
        // Right-handed view space looks down -Z.
        assert!((p.z + 10.0).abs() < 1e-5);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
    }

    #[test]
    fn rotation_order_is_elevation_then_azimuth() {
        let state = CameraState {
            angle_azimuth: 0.4,
            angle_elevation: 0.9,
            distance_factor: 1.0,
            target: Vec3::ZERO,
        };
        let view = compute_view_matrix(&state, 15.0);
        let swapped = Mat4::look_at_rh(
            Vec3::new(-15.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::Z,
        ) * Mat4::from_rotation_z(0.4)
            * Mat4::from_rotation_y(0.9);
        assert!(!view.abs_diff_eq(swapped, 1e-4));
    }

    #[test]
    fn drag_rotates_angles() {
        let mut cam = camera();
        let before = *cam.state();
        cam.rotate(Vec2::new(10.0, 4.0));
        assert!((cam.state().angle_azimuth - (before.angle_azimuth + 0.05)).abs() < 1e-6);
        assert!((cam.state().angle_elevation - (before.angle_elevation - 0.02)).abs() < 1e-6);
    }

    #[test]
    fn pan_follows_inverse_azimuth() {
        let mut cam = camera();
        cam.set_state(CameraState {
            angle_azimuth: 0.0,
            ..CameraState::default()
        });
        cam.pan(Vec2::new(10.0, 0.0));
        let target = cam.state().target;
        assert!(target.x.abs() < 1e-6);
        assert!((target.y + 0.1).abs() < 1e-6);
        assert_eq!(target.z, 0.0);
    }

    #[test]
    fn preset_is_canonical() {
        let mut cam = camera();
        cam.rotate(Vec2::new(40.0, -12.0));
        cam.pan(Vec2::new(3.0, 8.0));
        cam.zoom(-1.0);
        cam.apply_preset();
        let s = cam.state();
        assert_eq!(s.angle_azimuth, -FRAC_PI_2);
        assert_eq!(s.angle_elevation, -FRAC_PI_6);
        assert_eq!(s.distance_factor, 0.8);
        assert_eq!(s.target, Vec3::ZERO);
        assert!((cam.distance() - 12.0).abs() < 1e-5);
    }
}
