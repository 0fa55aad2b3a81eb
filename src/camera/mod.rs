//! Camera system for 3D scene viewing.
//!
//! Provides an orbit camera (azimuth/elevation/distance around a target
//! point) and the perspective projection used by every pass.

/// Orbit parameters and the derived world-to-camera matrix.
pub mod orbit;
/// Perspective projection parameters.
pub mod projection;

pub use orbit::{compute_view_matrix, CameraState, OrbitCamera};
pub use projection::Projection;
