//! GPU resource management.
//!
//! Provides wgpu device/surface initialization, shader composition, the
//! pass pipelines and the wgpu [`RenderBackend`](crate::renderer::RenderBackend).

/// wgpu implementation of the pass seam.
pub mod backend;
/// Uniform buffers addressed by dynamic offset.
pub mod dynamic_buffer;
/// Layout entries and pipeline construction shared by every pass.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Per-light distance cubemaps.
pub mod shadow_map;
/// Depth attachment textures.
pub mod texture;
/// CPU mirrors of the WGSL uniform blocks.
pub mod uniforms;
