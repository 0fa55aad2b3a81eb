//! Shared utilities for the rendering engine.

/// FPS smoothing and frame limiting.
pub mod frame_timing;
