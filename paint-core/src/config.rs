//! Editor session configuration.

use serde::{Deserialize, Serialize};

use crate::{BrushParams, PaintResult, Rgb};

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;

/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 600;

/// Default number of undo entries kept, including the initial state.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Default upper bound for the brush size control.
pub const DEFAULT_MAX_BRUSH_SIZE: u32 = 100;

/// Configuration for an [`crate::EditorSession`].
///
/// Every field has a default, so partial JSON such as `{"width": 320}` is
/// accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Background color, also used by the eraser.
    pub background: Rgb,
    /// Maximum undo stack depth.
    pub max_history: usize,
    /// Largest accepted brush size.
    pub max_brush_size: u32,
    /// Initial brush settings.
    pub brush: BrushParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: Rgb::WHITE,
            max_history: DEFAULT_MAX_HISTORY,
            max_brush_size: DEFAULT_MAX_BRUSH_SIZE,
            brush: BrushParams::default(),
        }
    }
}

impl SessionConfig {
    /// Create a default configuration for a canvas of the given size.
    #[must_use]
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PaintError::Serialization`] if the JSON is invalid.
    pub fn from_json(json: &str) -> PaintResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
