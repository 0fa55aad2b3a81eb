use serde::{Deserialize, Serialize};

/// Debug visualization toggles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DebugOptions {
    /// Show the debug overlay (sim time, camera, FPS) from the first frame.
    pub show_overlay: bool,
}
