//! The editor session: one context object owning every piece of editor
//! state and enforcing the redraw/capture sequencing between them.

use std::fmt;

use image::RgbaImage;

use crate::{
    BrushParams, Compositor, HistoryManager, LayerListEntry, LayerStore, PaintResult, Point, Rgb,
    SessionCommand, SessionConfig, Snapshot, Tool, ToolController,
};

/// Callback receiving the layer list after each layer-store change.
pub type LayerListListener = Box<dyn FnMut(&[LayerListEntry])>;

/// A read-only view of one layer for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerExport<'a> {
    /// Layer display name.
    pub name: &'a str,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Left offset; layers always cover the canvas, so this is 0.
    pub left: u32,
    /// Top offset; always 0.
    pub top: u32,
    /// Row-major RGBA8 pixels, non-premultiplied.
    pub pixels: &'a [u8],
}

/// An editing session over a layered canvas.
///
/// # Example
///
/// ```
/// use paint_core::{EditorSession, Point, SessionConfig};
///
/// let mut session = EditorSession::new(SessionConfig::with_size(64, 64)).unwrap();
/// session.pointer_down(Point::new(4.0, 4.0));
/// session.pointer_move(Point::new(40.0, 4.0));
/// session.pointer_up().unwrap();
///
/// assert!(session.can_undo());
/// session.undo().unwrap();
/// assert!(session.layers().active_layer().is_blank());
/// ```
pub struct EditorSession {
    config: SessionConfig,
    layers: LayerStore,
    compositor: Compositor,
    history: HistoryManager,
    tools: ToolController,
    layer_listener: Option<LayerListListener>,
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("config", &self.config)
            .field("layers", &self.layers.len())
            .field("active", &self.layers.active_index())
            .field("undo_depth", &self.history.undo_depth())
            .field("redo_depth", &self.history.redo_depth())
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Create a session with one transparent layer and capture the
    /// initial history entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial snapshot cannot be encoded.
    pub fn new(config: SessionConfig) -> PaintResult<Self> {
        let layers = LayerStore::new(config.width, config.height);
        let mut compositor = Compositor::new(config.width, config.height);
        let mut history = HistoryManager::new(config.max_history);
        let tools = ToolController::new(config.brush, config.background, config.max_brush_size);

        compositor.render(layers.layers());
        history.capture(&layers)?;
        tracing::info!("Paint session started: {}x{}", config.width, config.height);

        Ok(Self {
            config,
            layers,
            compositor,
            history,
            tools,
            layer_listener: None,
        })
    }

    // -----------------------------------------------------------------------
    // Layer commands
    // -----------------------------------------------------------------------

    /// Append a transparent layer and make it active.
    ///
    /// Returns the new layer's index.
    ///
    /// # Errors
    ///
    /// Returns an error if the history snapshot cannot be encoded.
    pub fn add_layer(&mut self) -> PaintResult<usize> {
        let index = self.layers.add_layer();
        self.notify_layers();
        self.redraw();
        self.history.capture(&self.layers)?;
        Ok(index)
    }

    /// Delete the active layer. No-op when it is the only layer.
    ///
    /// Returns whether a layer was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the history snapshot cannot be encoded.
    pub fn delete_layer(&mut self) -> PaintResult<bool> {
        if !self.layers.delete_layer() {
            return Ok(false);
        }
        self.notify_layers();
        self.redraw();
        self.history.capture(&self.layers)?;
        Ok(true)
    }

    /// Make the layer at `index` the drawing target.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PaintError::InvalidIndex`] for a bad index.
    pub fn select_layer(&mut self, index: usize) -> PaintResult<()> {
        self.layers.select_layer(index)?;
        self.notify_layers();
        Ok(())
    }

    /// Rename a layer. Names are not part of history.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PaintError::InvalidIndex`] for a bad index.
    pub fn rename_layer(&mut self, index: usize, name: impl Into<String>) -> PaintResult<()> {
        self.layers.rename_layer(index, name)?;
        self.notify_layers();
        Ok(())
    }

    /// Clear every layer, then capture a single history entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the history snapshot cannot be encoded.
    pub fn clear_all(&mut self) -> PaintResult<()> {
        self.layers.clear_all();
        self.redraw();
        self.history.capture(&self.layers)
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Step back one history entry. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PaintError::DecodeFailure`] if the previous state
    /// cannot be decoded; the canvas is left untouched.
    pub fn undo(&mut self) -> PaintResult<bool> {
        let changed = self.history.undo(&mut self.layers, &mut self.compositor)?;
        if changed {
            self.notify_layers();
        }
        Ok(changed)
    }

    /// Step forward one history entry. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PaintError::DecodeFailure`] if the state cannot be
    /// decoded; the canvas is left untouched.
    pub fn redo(&mut self) -> PaintResult<bool> {
        let changed = self.history.redo(&mut self.layers, &mut self.compositor)?;
        if changed {
            self.notify_layers();
        }
        Ok(changed)
    }

    /// Encode the current layers without touching history.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer cannot be encoded.
    pub fn snapshot(&self) -> PaintResult<Snapshot> {
        Snapshot::capture(&self.layers)
    }

    /// Load a snapshot into the layers without touching history.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PaintError::DecodeFailure`] if any entry cannot be
    /// decoded; no layer is modified in that case.
    pub fn restore(&mut self, snapshot: &Snapshot) -> PaintResult<()> {
        HistoryManager::restore(snapshot, &mut self.layers, &mut self.compositor)?;
        self.notify_layers();
        Ok(())
    }

    /// Whether [`Self::undo`] would change anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`Self::redo`] would change anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// Arm a stroke at `point`.
    pub fn pointer_down(&mut self, point: Point) {
        self.tools.pointer_down(point);
    }

    /// Extend the stroke toward `point` and redraw.
    ///
    /// Returns whether anything was painted.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let painted = self
            .tools
            .pointer_move(point, self.layers.active_layer_mut());
        if painted {
            self.redraw();
        }
        painted
    }

    /// Finish the stroke and capture it into history.
    ///
    /// A release without a preceding press changes nothing. Returns
    /// whether a stroke was finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the history snapshot cannot be encoded.
    pub fn pointer_up(&mut self) -> PaintResult<bool> {
        if !self.tools.pointer_up() {
            return Ok(false);
        }
        self.history.capture(&self.layers)?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Brush controls
    // -----------------------------------------------------------------------

    /// Current brush settings.
    #[must_use]
    pub fn brush(&self) -> &BrushParams {
        self.tools.brush()
    }

    /// Select pen, eraser or lasso.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tools.set_tool(tool);
    }

    /// Set the brush width (clamped to the configured range).
    pub fn set_brush_size(&mut self, size: u32) {
        self.tools.set_brush_size(size);
    }

    /// Set the pen color.
    pub fn set_color(&mut self, color: Rgb) {
        self.tools.set_color(color);
    }

    /// Set the pen color from a `#rrggbb` string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PaintError::InvalidColor`] for a malformed string.
    pub fn set_color_hex(&mut self, color: &str) -> PaintResult<()> {
        self.tools.set_color(Rgb::parse_hex(color)?);
        Ok(())
    }

    /// Set the stabilization strength (clamped to `0..=10`).
    pub fn set_stabilization(&mut self, strength: f32) {
        self.tools.set_stabilization(strength);
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Dispatch a single command.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation.
    pub fn apply(&mut self, command: &SessionCommand) -> PaintResult<()> {
        tracing::trace!("Apply {command:?}");
        match command {
            SessionCommand::PointerDown { x, y } => self.pointer_down(Point::new(*x, *y)),
            SessionCommand::PointerMove { x, y } => {
                self.pointer_move(Point::new(*x, *y));
            }
            SessionCommand::PointerUp => {
                self.pointer_up()?;
            }
            SessionCommand::SelectTool { tool } => self.set_tool(*tool),
            SessionCommand::SetBrushSize { size } => self.set_brush_size(*size),
            SessionCommand::SetColor { color } => self.set_color(*color),
            SessionCommand::SetStabilization { strength } => self.set_stabilization(*strength),
            SessionCommand::AddLayer => {
                self.add_layer()?;
            }
            SessionCommand::DeleteLayer => {
                self.delete_layer()?;
            }
            SessionCommand::SelectLayer { index } => self.select_layer(*index)?,
            SessionCommand::RenameLayer { index, name } => self.rename_layer(*index, name.clone())?,
            SessionCommand::ClearAll => self.clear_all()?,
            SessionCommand::Undo => {
                self.undo()?;
            }
            SessionCommand::Redo => {
                self.redo()?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The layer store.
    #[must_use]
    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    /// The history manager.
    #[must_use]
    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// The composited visible surface.
    #[must_use]
    pub fn composite(&self) -> &RgbaImage {
        self.compositor.surface()
    }

    /// Number of composites drawn so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.compositor.frame_count()
    }

    /// The ordered `(name, is_active)` layer list.
    #[must_use]
    pub fn layer_list(&self) -> Vec<LayerListEntry> {
        self.layers.layer_list()
    }

    /// Register a callback for layer-list changes.
    ///
    /// The callback is invoked immediately with the current list, then after
    /// every add, delete, select, rename, undo and redo.
    pub fn set_layer_list_listener(&mut self, listener: impl FnMut(&[LayerListEntry]) + 'static) {
        self.layer_listener = Some(Box::new(listener));
        self.notify_layers();
    }

    /// Per-layer geometry and pixels, bottom first.
    #[must_use]
    pub fn export_layers(&self) -> Vec<LayerExport<'_>> {
        self.layers
            .layers()
            .iter()
            .map(|layer| {
                let (width, height) = layer.buffer().dimensions();
                LayerExport {
                    name: &layer.name,
                    width,
                    height,
                    left: 0,
                    top: 0,
                    pixels: layer.buffer().as_raw(),
                }
            })
            .collect()
    }

    fn redraw(&mut self) {
        self.compositor.render(self.layers.layers());
    }

    fn notify_layers(&mut self) {
        if let Some(listener) = self.layer_listener.as_mut() {
            listener(&self.layers.layer_list());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::PaintError;

    fn session() -> EditorSession {
        EditorSession::new(SessionConfig::with_size(32, 32)).unwrap()
    }

    fn stroke(session: &mut EditorSession, from: (f32, f32), to: (f32, f32)) {
        session.pointer_down(Point::new(from.0, from.1));
        session.pointer_move(Point::new(to.0, to.1));
        session.pointer_up().unwrap();
    }

    #[test]
    fn new_session_has_initial_snapshot() {
        let session = session();
        assert_eq!(session.history().undo_depth(), 1);
        assert_eq!(session.layers().len(), 1);
        assert_eq!(session.frame_count(), 1);
        assert!(!session.can_undo());
    }

    #[test]
    fn stroke_is_composited_and_captured() {
        let mut session = session();
        session.set_color(Rgb::new(255, 0, 0));
        stroke(&mut session, (2.0, 8.0), (28.0, 8.0));
        assert_eq!(session.history().undo_depth(), 2);
        assert_eq!(session.composite().get_pixel(15, 8).0, [255, 0, 0, 255]);
    }

    #[test]
    fn stray_pointer_up_does_not_capture() {
        let mut session = session();
        assert!(!session.pointer_up().unwrap());
        assert_eq!(session.history().undo_depth(), 1);
    }

    #[test]
    fn lasso_stroke_paints_nothing() {
        let mut session = session();
        session.set_tool(Tool::Lasso);
        stroke(&mut session, (2.0, 8.0), (28.0, 8.0));
        assert!(session.layers().active_layer().is_blank());
    }

    #[test]
    fn rename_is_not_undone() {
        let mut session = session();
        stroke(&mut session, (2.0, 8.0), (28.0, 8.0));
        session.rename_layer(0, "Ink").unwrap();
        session.undo().unwrap();
        assert_eq!(session.layers().active_layer().name, "Ink");
        assert!(session.layers().active_layer().is_blank());
    }

    #[test]
    fn undo_of_add_layer_removes_it() {
        let mut session = session();
        session.add_layer().unwrap();
        assert_eq!(session.layers().len(), 2);
        session.undo().unwrap();
        assert_eq!(session.layers().len(), 1);
        assert_eq!(session.layers().active_index(), 0);
        session.redo().unwrap();
        assert_eq!(session.layers().len(), 2);
        assert_eq!(session.layers().get(1).unwrap().name, "Layer 2");
    }

    #[test]
    fn clear_all_captures_once() {
        let mut session = session();
        session.add_layer().unwrap();
        stroke(&mut session, (2.0, 8.0), (28.0, 8.0));
        let depth = session.history().undo_depth();
        session.clear_all().unwrap();
        assert_eq!(session.history().undo_depth(), depth + 1);
        assert!(session.layers().layers().iter().all(crate::Layer::is_blank));
    }

    #[test]
    fn listener_sees_every_layer_change() {
        let seen: Rc<RefCell<Vec<Vec<LayerListEntry>>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let mut session = session();
        session.set_layer_list_listener(move |list| sink.borrow_mut().push(list.to_vec()));

        session.add_layer().unwrap();
        session.select_layer(0).unwrap();
        session.rename_layer(1, "Top").unwrap();
        session.delete_layer().unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[1].len(), 2);
        assert!(seen[1][1].active);
        assert!(seen[2][0].active);
        assert_eq!(seen[3][1].name, "Top");
        assert_eq!(seen[4].len(), 1);
        assert_eq!(seen[4][0].name, "Top");
    }

    #[test]
    fn invalid_select_is_reported() {
        let mut session = session();
        assert!(matches!(
            session.select_layer(3),
            Err(PaintError::InvalidIndex { index: 3, len: 1 })
        ));
    }

    #[test]
    fn export_exposes_geometry_and_pixels() {
        let mut session = session();
        session.add_layer().unwrap();
        let exports = session.export_layers();
        assert_eq!(exports.len(), 2);
        assert_eq!(exports[1].name, "Layer 2");
        assert_eq!((exports[1].width, exports[1].height), (32, 32));
        assert_eq!((exports[1].left, exports[1].top), (0, 0));
        assert_eq!(exports[1].pixels.len(), 32 * 32 * 4);
    }

    #[test]
    fn apply_dispatches_commands() {
        let mut session = session();
        let script = [
            SessionCommand::AddLayer,
            SessionCommand::SetColor { color: Rgb::new(0, 0, 255) },
            SessionCommand::SetBrushSize { size: 3 },
            SessionCommand::PointerDown { x: 4.0, y: 4.0 },
            SessionCommand::PointerMove { x: 20.0, y: 4.0 },
            SessionCommand::PointerUp,
            SessionCommand::RenameLayer { index: 1, name: "Blue".into() },
        ];
        for command in &script {
            session.apply(command).unwrap();
        }
        assert_eq!(session.brush().size, 3);
        assert_eq!(session.layers().active_layer().name, "Blue");
        assert_eq!(
            session.layers().active_layer().buffer().get_pixel(10, 4).0,
            [0, 0, 255, 255]
        );
        assert_eq!(session.history().undo_depth(), 3);
    }
}
