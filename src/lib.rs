// Lint policy lives in `[workspace.lints]` of Cargo.toml; thresholds in
// clippy.toml.

//! Real-time orbit-camera renderer with shadow-mapped multi-light Phong
//! shading, built on wgpu.
//!
//! # Key entry points
//!
//! - [`engine::SceneRenderEngine`] - per-frame orchestration of clock,
//!   camera, lights and passes
//! - [`renderer::RenderBackend`] - the pass seam; [`gpu::backend::GpuBackend`]
//!   implements it with wgpu
//! - [`scene::Scene`] - actors and meshes
//! - [`lighting::Light`] - point lights and their shadow/Phong contract
//! - [`options::Options`] - TOML-backed configuration
//!
//! # Architecture
//!
//! Startup fetches every shader and mesh concurrently through an
//! [`assets::ResourceProvider`], then builds the scene and the GPU backend.
//! Each frame advances the simulation clock, updates lights and actors,
//! clears, draws the ambient base pass, and then for every light renders
//! its distance cubemap followed by its additive Phong contribution.

pub mod assets;
pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod lighting;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
mod viewer;

pub use engine::command::EngineCommand;
pub use engine::{FrameStatus, SceneRenderEngine, ViewOverride};
pub use error::{PenumbraError, RenderError};
pub use input::{InputEvent, MouseButton};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
