//! WebAssembly bindings for paint-core.
//!
//! The page owns the DOM: it forwards pointer events and control changes
//! here, re-renders the layer panel from `layerListJson`, and blits
//! `compositePixels` into an `ImageData`.

use wasm_bindgen::prelude::*;

use crate::{EditorSession, Point, SessionCommand, SessionConfig, Tool};

/// Initialize the paint WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Editor session handle for JavaScript.
#[wasm_bindgen]
pub struct WasmPaintSession {
    session: EditorSession,
}

#[wasm_bindgen]
impl WasmPaintSession {
    /// Create a session from optional configuration JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the JSON is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmPaintSession, String> {
        let config = match config_json {
            Some(json) => SessionConfig::from_json(&json).map_err(|e| e.to_string())?,
            None => SessionConfig::default(),
        };
        let session = EditorSession::new(config).map_err(|e| e.to_string())?;
        Ok(Self { session })
    }

    /// Canvas width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.session.config().width
    }

    /// Canvas height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.session.config().height
    }

    /// Pointer pressed.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.session.pointer_down(Point::new(x, y));
    }

    /// Pointer moved. Returns true if the composite changed.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.session.pointer_move(Point::new(x, y))
    }

    /// Pointer released.
    ///
    /// # Errors
    ///
    /// Returns an error string if the history snapshot fails.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) -> Result<bool, String> {
        self.session.pointer_up().map_err(|e| e.to_string())
    }

    /// Select `pen`, `eraser` or `lasso`.
    ///
    /// # Errors
    ///
    /// Returns an error string for an unknown tool name.
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&mut self, tool: &str) -> Result<(), String> {
        let tool: Tool = tool.parse()?;
        self.session.set_tool(tool);
        Ok(())
    }

    /// Set the brush width.
    #[wasm_bindgen(js_name = setBrushSize)]
    pub fn set_brush_size(&mut self, size: u32) {
        self.session.set_brush_size(size);
    }

    /// Set the pen color from `#rrggbb`.
    ///
    /// # Errors
    ///
    /// Returns an error string for a malformed color.
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, color: &str) -> Result<(), String> {
        self.session.set_color_hex(color).map_err(|e| e.to_string())
    }

    /// Set the stabilization strength.
    #[wasm_bindgen(js_name = setStabilization)]
    pub fn set_stabilization(&mut self, strength: f32) {
        self.session.set_stabilization(strength);
    }

    /// Apply a JSON-encoded command.
    ///
    /// # Errors
    ///
    /// Returns an error string if parsing or the command fails.
    #[wasm_bindgen(js_name = applyCommandJson)]
    pub fn apply_command_json(&mut self, json: &str) -> Result<(), String> {
        let command: SessionCommand = serde_json::from_str(json).map_err(|e| e.to_string())?;
        self.session.apply(&command).map_err(|e| e.to_string())
    }

    /// Undo. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error string if the previous state cannot be decoded.
    pub fn undo(&mut self) -> Result<bool, String> {
        self.session.undo().map_err(|e| e.to_string())
    }

    /// Redo. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error string if the state cannot be decoded.
    pub fn redo(&mut self) -> Result<bool, String> {
        self.session.redo().map_err(|e| e.to_string())
    }

    /// The layer list as a JSON array of `{name, active}`.
    #[wasm_bindgen(js_name = layerListJson)]
    #[must_use]
    pub fn layer_list_json(&self) -> String {
        serde_json::to_string(&self.session.layer_list()).unwrap_or_default()
    }

    /// Number of layers.
    #[wasm_bindgen(js_name = layerCount)]
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.session.layers().len()
    }

    /// Composited RGBA pixels, ready for `new ImageData(pixels, width)`.
    #[wasm_bindgen(js_name = compositePixels)]
    #[must_use]
    pub fn composite_pixels(&self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(self.session.composite().as_raw().as_slice())
    }

    /// One layer's RGBA pixels for export.
    ///
    /// # Errors
    ///
    /// Returns an error string for a bad index.
    #[wasm_bindgen(js_name = layerPixels)]
    pub fn layer_pixels(&self, index: usize) -> Result<js_sys::Uint8ClampedArray, String> {
        self.session
            .layers()
            .get(index)
            .map(|layer| js_sys::Uint8ClampedArray::from(layer.buffer().as_raw().as_slice()))
            .ok_or_else(|| format!("Invalid layer index {index}"))
    }
}
