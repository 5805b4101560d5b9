//! Flattens the layer stack onto the visible output surface.

use image::{imageops, RgbaImage};

use crate::{raster, Layer};

/// Owns the visible surface and redraws it from the layer stack.
///
/// Layers are blended in store order with normal source-over blending at
/// full opacity, so opaque pixels of a later layer cover earlier ones.
#[derive(Debug, Clone)]
pub struct Compositor {
    surface: RgbaImage,
    frame_count: u64,
}

impl Compositor {
    /// Create a compositor with a transparent surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: raster::transparent_buffer(width, height),
            frame_count: 0,
        }
    }

    /// Clear the surface and draw every layer onto it, bottom first.
    pub fn render(&mut self, layers: &[Layer]) {
        raster::clear(&mut self.surface);
        for layer in layers {
            imageops::overlay(&mut self.surface, layer.buffer(), 0, 0);
        }
        self.frame_count += 1;
        tracing::trace!(
            "Composited {} layers (frame {})",
            layers.len(),
            self.frame_count
        );
    }

    /// The most recently composited frame.
    #[must_use]
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Number of frames composited so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
