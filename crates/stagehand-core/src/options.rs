//! Startup configuration for a stagehand engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render_state::RenderState;

/// Engine configuration, read once at startup.
///
/// Every field has a default, so a config file only needs to name what it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Initial render state.
    pub render: RenderState,

    /// Initial camera lag, in [0, 1).
    pub camera_lag: f32,

    /// Window size requested at startup.
    pub screen_size: (u32, u32),

    /// Whether every dispatched command is logged at debug level.
    pub trace_commands: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            render: RenderState::default(),
            camera_lag: 0.0,
            screen_size: (720, 576),
            trace_commands: false,
        }
    }
}

impl Options {
    /// Parses options from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
