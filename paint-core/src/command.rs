//! Commands accepted by an editor session.
//!
//! These mirror the UI surface: pointer events, brush controls, tool
//! buttons and the single-shot layer/history commands. They serialize as
//! flat JSON objects tagged by `type`, e.g.
//! `{"type": "pointer_move", "x": 12.0, "y": 40.5}`.

use serde::{Deserialize, Serialize};

use crate::{Point, Rgb, Tool};

/// A single input to an [`crate::EditorSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionCommand {
    /// Pointer pressed at a surface-local position.
    PointerDown {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Pointer moved to a surface-local position.
    PointerMove {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Pointer released.
    PointerUp,
    /// Switch drawing mode.
    SelectTool {
        /// The tool to use.
        tool: Tool,
    },
    /// Change the brush width.
    SetBrushSize {
        /// Width in pixels.
        size: u32,
    },
    /// Change the pen color.
    SetColor {
        /// Opaque color as `#rrggbb`.
        color: Rgb,
    },
    /// Change the stabilization strength.
    SetStabilization {
        /// Strength, `0..=10`.
        strength: f32,
    },
    /// Append a new layer.
    AddLayer,
    /// Delete the active layer.
    DeleteLayer,
    /// Make a layer active.
    SelectLayer {
        /// Layer index, bottom first.
        index: usize,
    },
    /// Rename a layer.
    RenameLayer {
        /// Layer index, bottom first.
        index: usize,
        /// New display name.
        name: String,
    },
    /// Clear every layer.
    ClearAll,
    /// Step back in history.
    Undo,
    /// Step forward in history.
    Redo,
}

impl SessionCommand {
    /// The pointer position carried by this command, if any.
    #[must_use]
    pub fn point(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y } | Self::PointerMove { x, y } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }

    /// Parse a JSON array of commands.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PaintError::Serialization`] if the JSON is invalid.
    pub fn parse_script(json: &str) -> crate::PaintResult<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_use_flat_snake_case_tags() {
        let json = serde_json::to_string(&SessionCommand::PointerMove { x: 1.0, y: 2.5 }).unwrap();
        assert_eq!(json, r#"{"type":"pointer_move","x":1.0,"y":2.5}"#);
        let json = serde_json::to_string(&SessionCommand::ClearAll).unwrap();
        assert_eq!(json, r#"{"type":"clear_all"}"#);
    }

    #[test]
    fn script_parses_mixed_commands() {
        let script = r##"[
            {"type": "select_tool", "tool": "eraser"},
            {"type": "set_color", "color": "#00ff00"},
            {"type": "rename_layer", "index": 0, "name": "Ink"},
            {"type": "pointer_down", "x": 3, "y": 4},
            {"type": "undo"}
        ]"##;
        let commands = SessionCommand::parse_script(script).unwrap();
        assert_eq!(commands.len(), 5);
        assert_eq!(commands[0], SessionCommand::SelectTool { tool: Tool::Eraser });
        assert_eq!(commands[1], SessionCommand::SetColor { color: Rgb::new(0, 255, 0) });
        assert_eq!(commands[3].point(), Some(Point::new(3.0, 4.0)));
        assert_eq!(commands[4], SessionCommand::Undo);
    }

    #[test]
    fn unknown_commands_are_rejected() {
        assert!(SessionCommand::parse_script(r#"[{"type": "rotate"}]"#).is_err());
        assert!(SessionCommand::parse_script(r#"[{"type": "select_layer"}]"#).is_err());
    }
}
