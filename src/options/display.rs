use serde::{Deserialize, Serialize};

/// Frame presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayOptions {
    /// RGBA color the frame is cleared to before the ambient pass.
    pub background: [f32; 4],
    /// Frame limiter target (0 = unlimited).
    pub target_fps: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            background: [0.0, 0.65, 1.0, 1.0],
            target_fps: 0,
        }
    }
}
