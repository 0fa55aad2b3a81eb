//! Crate-level error types.

use std::fmt;

use crate::assets::AssetError;
use crate::gpu::render_context::RenderContextError;

/// Errors produced by the penumbra crate during startup and session setup.
#[derive(Debug)]
pub enum PenumbraError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// A required shader or mesh failed to load.
    Asset(AssetError),
    /// WGSL composition or validation failure.
    Shader(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for PenumbraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Asset(e) => write!(f, "asset error: {e}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for PenumbraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Asset(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for PenumbraError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<AssetError> for PenumbraError {
    fn from(e: AssetError) -> Self {
        Self::Asset(e)
    }
}

impl From<std::io::Error> for PenumbraError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors raised while encoding or presenting a single frame.
///
/// None of these abort the session: the viewer reconfigures the surface on
/// [`RenderError::Surface`], and the light contract downgrades
/// [`RenderError::ShadowTargetUnavailable`] to an unshadowed pass.
#[derive(Debug)]
pub enum RenderError {
    /// Acquiring or presenting the swapchain texture failed.
    Surface(wgpu::SurfaceError),
    /// The light in this slot has no usable shadowmap target.
    ShadowTargetUnavailable {
        /// Index of the light in the declared light list.
        slot: usize,
    },
    /// A pass was issued outside `begin_frame` / `end_frame`.
    NoFrameInProgress,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "surface error: {e}"),
            Self::ShadowTargetUnavailable { slot } => {
                write!(f, "shadowmap target unavailable for light {slot}")
            }
            Self::NoFrameInProgress => write!(f, "no frame in progress"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        Self::Surface(e)
    }
}
