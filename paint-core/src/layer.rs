//! Layer store: the ordered stack of raster layers and the active index.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::snapshot::DecodedLayer;
use crate::{raster, PaintError, PaintResult};

/// A single paintable raster layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// User-visible display name.
    pub name: String,
    id: u64,
    buffer: RgbaImage,
}

impl Layer {
    /// Create a fully transparent layer.
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            id: 0,
            buffer: raster::transparent_buffer(width, height),
        }
    }

    /// Identifier assigned by the owning store. Stable across renames,
    /// reordering by deletion and history restores.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The layer's pixels.
    #[must_use]
    pub fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Mutable access to the layer's pixels.
    pub fn buffer_mut(&mut self) -> &mut RgbaImage {
        &mut self.buffer
    }

    /// Whether every pixel is fully transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.buffer.pixels().all(|p| p.0[3] == 0)
    }
}

/// One row of the layer list shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerListEntry {
    /// Layer display name.
    pub name: String,
    /// Whether this is the active layer.
    pub active: bool,
}

/// Ordered collection of layers with exactly one active layer.
///
/// The store never holds fewer than one layer, and the active index is
/// always in range.
#[derive(Debug, Clone)]
pub struct LayerStore {
    layers: Vec<Layer>,
    active: usize,
    next_id: u64,
    width: u32,
    height: u32,
}

impl LayerStore {
    /// Create a store holding a single transparent "Layer 1".
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layers: vec![Layer::new("Layer 1", width, height)],
            active: 0,
            next_id: 1,
            width,
            height,
        }
    }

    /// Canvas dimensions shared by every layer.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false; the store keeps at least one layer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// All layers, bottom first.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Get a layer by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Index of the active layer.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The active layer.
    #[must_use]
    pub fn active_layer(&self) -> &Layer {
        &self.layers[self.active]
    }

    /// Mutable access to the active layer, the only one drawing touches.
    pub fn active_layer_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.active]
    }

    /// Append a transparent layer named "Layer N" and make it active.
    ///
    /// Returns the new layer's index.
    pub fn add_layer(&mut self) -> usize {
        let name = format!("Layer {}", self.layers.len() + 1);
        tracing::debug!("Adding layer '{name}'");
        let mut layer = Layer::new(name, self.width, self.height);
        layer.id = self.next_id;
        self.next_id += 1;
        self.layers.push(layer);
        self.active = self.layers.len() - 1;
        self.active
    }

    /// Delete the active layer.
    ///
    /// Does nothing when only one layer remains. Returns whether a layer
    /// was removed.
    pub fn delete_layer(&mut self) -> bool {
        // The active index is always valid.
        self.delete_layer_at(self.active).unwrap_or(false)
    }

    /// Delete the layer at `index`.
    ///
    /// Does nothing when only one layer remains. Deleting the active layer
    /// moves the selection to `max(0, index - 1)`; deleting a layer below
    /// the active one keeps the same layer selected.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::InvalidIndex`] if `index` is out of range.
    pub fn delete_layer_at(&mut self, index: usize) -> PaintResult<bool> {
        self.check_index(index)?;
        if self.layers.len() <= 1 {
            tracing::debug!("Refusing to delete the last layer");
            return Ok(false);
        }

        let removed = self.layers.remove(index);
        tracing::debug!("Deleted layer {index} '{}'", removed.name);
        if index < self.active || (index == self.active && self.active > 0) {
            self.active -= 1;
        }
        Ok(true)
    }

    /// Make the layer at `index` active.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::InvalidIndex`] if `index` is out of range.
    pub fn select_layer(&mut self, index: usize) -> PaintResult<()> {
        self.check_index(index)?;
        self.active = index;
        Ok(())
    }

    /// Change a layer's display name.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::InvalidIndex`] if `index` is out of range.
    pub fn rename_layer(&mut self, index: usize, name: impl Into<String>) -> PaintResult<()> {
        self.check_index(index)?;
        self.layers[index].name = name.into();
        Ok(())
    }

    /// Reset every layer's pixels to transparent.
    pub fn clear_all(&mut self) {
        for layer in &mut self.layers {
            raster::clear(layer.buffer_mut());
        }
    }

    /// The ordered `(name, is_active)` list for the layer panel.
    #[must_use]
    pub fn layer_list(&self) -> Vec<LayerListEntry> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, layer)| LayerListEntry {
                name: layer.name.clone(),
                active: i == self.active,
            })
            .collect()
    }

    /// Rebuild the stack from restored layers, in their recorded order.
    ///
    /// Layers are matched by id, not position. A layer that still exists
    /// keeps its current name; one that no longer exists comes back under
    /// its recorded name. The active layer stays selected if it survives,
    /// otherwise the active index is clamped.
    pub(crate) fn replace_contents(&mut self, restored: Vec<DecodedLayer>) {
        if restored.is_empty() {
            return;
        }
        let active_id = self.active_layer().id;
        let mut current = std::mem::take(&mut self.layers);

        self.layers = restored
            .into_iter()
            .map(|entry| {
                let name = current
                    .iter()
                    .position(|l| l.id == entry.id)
                    .map_or(entry.name, |i| current.swap_remove(i).name);
                Layer {
                    name,
                    id: entry.id,
                    buffer: entry.buffer,
                }
            })
            .collect();

        if let Some(max_id) = self.layers.iter().map(|l| l.id).max() {
            self.next_id = self.next_id.max(max_id + 1);
        }
        self.active = self
            .layers
            .iter()
            .position(|l| l.id == active_id)
            .unwrap_or_else(|| self.active.min(self.layers.len() - 1));
    }

    fn check_index(&self, index: usize) -> PaintResult<()> {
        if index < self.layers.len() {
            Ok(())
        } else {
            tracing::warn!("Rejected layer index {index} of {}", self.layers.len());
            Err(PaintError::InvalidIndex {
                index,
                len: self.layers.len(),
            })
        }
    }
}
