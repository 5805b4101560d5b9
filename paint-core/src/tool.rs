//! Tool selection, brush parameters and pointer handling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::smoother::{self, Point};
use crate::{raster, Layer, Rgb};

/// Drawing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Paints with the brush color.
    #[default]
    Pen,
    /// Paints with the opaque background color. It does not restore
    /// transparency.
    Eraser,
    /// Selection mode placeholder. Pointer movement never paints.
    Lasso,
}

impl Tool {
    /// Lowercase tool name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pen => "pen",
            Self::Eraser => "eraser",
            Self::Lasso => "lasso",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pen" => Ok(Self::Pen),
            "eraser" => Ok(Self::Eraser),
            "lasso" => Ok(Self::Lasso),
            other => Err(format!("unknown tool: {other}")),
        }
    }
}

/// Brush settings read by the painting path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushParams {
    /// Current drawing mode.
    pub tool: Tool,
    /// Stroke width in pixels.
    pub size: u32,
    /// Pen color.
    pub color: Rgb,
    /// Stabilization strength, `0..=10`.
    pub stabilization: f32,
}

impl Default for BrushParams {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            size: 5,
            color: Rgb::BLACK,
            stabilization: 0.0,
        }
    }
}

/// Transient state of the stroke in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrokeState {
    /// Last committed (smoothed) point.
    pub last: Point,
    /// Whether a stroke is armed.
    pub painting: bool,
}

/// Routes pointer events into smoothed segments on the active layer.
#[derive(Debug, Clone)]
pub struct ToolController {
    brush: BrushParams,
    stroke: StrokeState,
    background: Rgb,
    max_brush_size: u32,
}

impl ToolController {
    /// Create a controller. The brush is normalized into valid ranges.
    #[must_use]
    pub fn new(brush: BrushParams, background: Rgb, max_brush_size: u32) -> Self {
        let mut controller = Self {
            brush,
            stroke: StrokeState::default(),
            background,
            max_brush_size: max_brush_size.max(1),
        };
        controller.set_brush_size(brush.size);
        controller.set_stabilization(brush.stabilization);
        controller
    }

    /// Current brush settings.
    #[must_use]
    pub fn brush(&self) -> &BrushParams {
        &self.brush
    }

    /// Current stroke state.
    #[must_use]
    pub fn stroke(&self) -> &StrokeState {
        &self.stroke
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_painting(&self) -> bool {
        self.stroke.painting
    }

    /// Select the drawing mode.
    pub fn set_tool(&mut self, tool: Tool) {
        self.brush.tool = tool;
    }

    /// Set the brush width, clamped to `1..=max_brush_size`.
    pub fn set_brush_size(&mut self, size: u32) {
        let clamped = size.clamp(1, self.max_brush_size);
        if clamped != size {
            tracing::warn!("Brush size {size} clamped to {clamped}");
        }
        self.brush.size = clamped;
    }

    /// Set the pen color.
    pub fn set_color(&mut self, color: Rgb) {
        self.brush.color = color;
    }

    /// Set the stabilization strength, clamped to `0..=10`.
    pub fn set_stabilization(&mut self, strength: f32) {
        let clamped = smoother::clamp_strength(strength);
        if (clamped - strength).abs() > f32::EPSILON || strength.is_nan() {
            tracing::warn!("Stabilization {strength} clamped to {clamped}");
        }
        self.brush.stabilization = clamped;
    }

    /// Arm a stroke at `point`.
    pub fn pointer_down(&mut self, point: Point) {
        self.stroke = StrokeState {
            last: point,
            painting: true,
        };
    }

    /// Paint one smoothed segment into `layer`.
    ///
    /// Returns `false` without touching anything when no stroke is armed or
    /// the lasso is selected.
    pub fn pointer_move(&mut self, point: Point, layer: &mut Layer) -> bool {
        if !self.stroke.painting || self.brush.tool == Tool::Lasso {
            return false;
        }

        let next = smoother::smooth(self.stroke.last, point, self.brush.stabilization);
        let color = match self.brush.tool {
            Tool::Eraser => self.background,
            Tool::Pen | Tool::Lasso => self.brush.color,
        };
        #[allow(clippy::cast_precision_loss)]
        let width = self.brush.size as f32;
        raster::stroke_segment(layer.buffer_mut(), self.stroke.last, next, width, color.to_rgba());
        self.stroke.last = next;
        true
    }

    /// End the stroke. Returns whether one was in progress.
    pub fn pointer_up(&mut self) -> bool {
        std::mem::replace(&mut self.stroke.painting, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ToolController {
        ToolController::new(BrushParams::default(), Rgb::WHITE, 100)
    }

    #[test]
    fn move_without_down_is_ignored() {
        let mut tools = controller();
        let mut layer = Layer::new("l", 32, 32);
        assert!(!tools.pointer_move(Point::new(5.0, 5.0), &mut layer));
        assert!(layer.is_blank());
    }

    #[test]
    fn pen_paints_brush_color() {
        let mut tools = controller();
        tools.set_color(Rgb::new(255, 0, 0));
        let mut layer = Layer::new("l", 32, 32);
        tools.pointer_down(Point::new(4.0, 4.0));
        assert!(tools.pointer_move(Point::new(20.0, 4.0), &mut layer));
        assert_eq!(layer.buffer().get_pixel(12, 4).0, [255, 0, 0, 255]);
        assert_eq!(tools.stroke().last, Point::new(20.0, 4.0));
    }

    #[test]
    fn eraser_paints_opaque_background() {
        let mut tools = controller();
        tools.set_tool(Tool::Eraser);
        let mut layer = Layer::new("l", 32, 32);
        tools.pointer_down(Point::new(4.0, 4.0));
        tools.pointer_move(Point::new(20.0, 4.0), &mut layer);
        assert_eq!(layer.buffer().get_pixel(12, 4).0, [255, 255, 255, 255]);
    }

    #[test]
    fn lasso_never_paints() {
        let mut tools = controller();
        tools.set_tool(Tool::Lasso);
        let mut layer = Layer::new("l", 32, 32);
        tools.pointer_down(Point::new(4.0, 4.0));
        assert!(!tools.pointer_move(Point::new(20.0, 4.0), &mut layer));
        assert!(layer.is_blank());
        assert_eq!(tools.stroke().last, Point::new(4.0, 4.0));
    }

    #[test]
    fn max_stabilization_keeps_stroke_in_place() {
        let mut tools = controller();
        tools.set_stabilization(10.0);
        let mut layer = Layer::new("l", 32, 32);
        tools.pointer_down(Point::new(4.0, 4.0));
        tools.pointer_move(Point::new(28.0, 28.0), &mut layer);
        assert_eq!(tools.stroke().last, Point::new(4.0, 4.0));
        assert_eq!(*layer.buffer().get_pixel(28, 28), raster::TRANSPARENT);
    }

    #[test]
    fn pointer_up_reports_armed_stroke_once() {
        let mut tools = controller();
        assert!(!tools.pointer_up());
        tools.pointer_down(Point::new(1.0, 1.0));
        assert!(tools.pointer_up());
        assert!(!tools.is_painting());
        assert!(!tools.pointer_up());
    }

    #[test]
    fn brush_inputs_are_clamped() {
        let mut tools = controller();
        tools.set_brush_size(0);
        assert_eq!(tools.brush().size, 1);
        tools.set_brush_size(5000);
        assert_eq!(tools.brush().size, 100);
        tools.set_stabilization(11.5);
        assert!((tools.brush().stabilization - 10.0).abs() < f32::EPSILON);
        tools.set_stabilization(-1.0);
        assert!(tools.brush().stabilization.abs() < f32::EPSILON);
    }

    #[test]
    fn tool_parses_and_serializes_lowercase() {
        assert_eq!("Eraser".parse::<Tool>().unwrap(), Tool::Eraser);
        assert!("brush".parse::<Tool>().is_err());
        assert_eq!(serde_json::to_string(&Tool::Lasso).unwrap(), "\"lasso\"");
    }
}
