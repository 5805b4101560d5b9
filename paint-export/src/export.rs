//! Layer export to flattened images and layered documents.
//!
//! Flattened output composites every layer, bottom first, over an opaque
//! background. The layered document keeps each layer separate: a JSON
//! manifest with the geometry, blend settings and a PNG data URI for each
//! layer.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, ImageEncoder, Rgba, RgbaImage};
use paint_core::snapshot::{encode_data_uri, encode_png};
use paint_core::{LayerExport, Rgb};
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};

/// Flattened output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
}

impl ExportFormat {
    /// Pick a format from a file extension (`png`, `jpg`, `jpeg`).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// Configuration for layer export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Color under the bottom layer in flattened output.
    pub background: Rgb,
    /// JPEG quality 1-100 (default: 90).
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            background: Rgb::WHITE,
            jpeg_quality: 90,
        }
    }
}

/// One layer inside a [`LayeredDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLayer {
    /// Layer name.
    pub name: String,
    /// Top offset in pixels.
    pub top: u32,
    /// Left offset in pixels.
    pub left: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Blend mode; always `normal`.
    pub blend_mode: String,
    /// Opacity 0-255; always 255.
    pub opacity: u8,
    /// Visibility flag; always true.
    pub visible: bool,
    /// Layer pixels as a PNG data URI.
    pub image: String,
}

/// A layered image document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayeredDocument {
    /// Document width in pixels.
    pub width: u32,
    /// Document height in pixels.
    pub height: u32,
    /// Layers, bottom first.
    pub layers: Vec<DocumentLayer>,
}

impl LayeredDocument {
    /// Serialize the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Encodes session layers into export formats.
pub struct LayerExporter {
    config: ExportConfig,
}

impl LayerExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Export the flattened layers in the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer is malformed or encoding fails.
    pub fn export(&self, layers: &[LayerExport<'_>], format: ExportFormat) -> ExportResult<Vec<u8>> {
        match format {
            ExportFormat::Png => self.render_to_png(layers),
            ExportFormat::Jpeg => self.render_to_jpeg(layers),
        }
    }

    /// Composite every layer over the background.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Empty`] for no layers and
    /// [`ExportError::InvalidLayer`] if a buffer does not match its size.
    pub fn flatten(&self, layers: &[LayerExport<'_>]) -> ExportResult<RgbaImage> {
        let first = layers.first().ok_or(ExportError::Empty)?;
        let mut out = RgbaImage::from_pixel(first.width, first.height, Rgba(self.config.background.to_rgba()));
        for layer in layers {
            let buffer = to_buffer(layer)?;
            imageops::overlay(&mut out, &buffer, i64::from(layer.left), i64::from(layer.top));
        }
        tracing::debug!(
            "Flattened {} layers to {}x{}",
            layers.len(),
            out.width(),
            out.height()
        );
        Ok(out)
    }

    /// Export the flattened layers to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer is malformed or encoding fails.
    pub fn render_to_png(&self, layers: &[LayerExport<'_>]) -> ExportResult<Vec<u8>> {
        let flat = self.flatten(layers)?;
        encode_png(&flat).map_err(|e| ExportError::Encode(format!("PNG encoding failed: {e}")))
    }

    /// Export the flattened layers to JPEG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer is malformed or encoding fails.
    pub fn render_to_jpeg(&self, layers: &[LayerExport<'_>]) -> ExportResult<Vec<u8>> {
        let flat = self.flatten(layers)?;
        let rgb = DynamicImage::ImageRgba8(flat).to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut buf = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality.clamp(1, 100))
            .write_image(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .map_err(|e| ExportError::Encode(format!("JPEG encoding failed: {e}")))?;
        Ok(buf.into_inner())
    }

    /// Build a layered document keeping every layer separate.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer is malformed or encoding fails.
    pub fn layered_document(&self, layers: &[LayerExport<'_>]) -> ExportResult<LayeredDocument> {
        let first = layers.first().ok_or(ExportError::Empty)?;
        let layers = layers
            .iter()
            .map(|layer| {
                let buffer = to_buffer(layer)?;
                let image = encode_data_uri(&buffer).map_err(|e| ExportError::Encode(e.to_string()))?;
                Ok(DocumentLayer {
                    name: layer.name.to_string(),
                    top: layer.top,
                    left: layer.left,
                    width: layer.width,
                    height: layer.height,
                    blend_mode: "normal".to_string(),
                    opacity: 255,
                    visible: true,
                    image,
                })
            })
            .collect::<ExportResult<Vec<_>>>()?;

        Ok(LayeredDocument {
            width: first.width,
            height: first.height,
            layers,
        })
    }
}

fn to_buffer(layer: &LayerExport<'_>) -> ExportResult<RgbaImage> {
    RgbaImage::from_raw(layer.width, layer.height, layer.pixels.to_vec()).ok_or_else(|| {
        ExportError::InvalidLayer {
            name: layer.name.to_string(),
            reason: format!(
                "{} bytes for {}x{} pixels",
                layer.pixels.len(),
                layer.width,
                layer.height
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_extension("PNG"), Some(ExportFormat::Png));
        assert_eq!(ExportFormat::from_extension("jpeg"), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_extension("psd"), None);
    }

    #[test]
    fn empty_export_is_an_error() {
        let exporter = LayerExporter::with_defaults();
        assert!(matches!(exporter.flatten(&[]), Err(ExportError::Empty)));
        assert!(matches!(exporter.layered_document(&[]), Err(ExportError::Empty)));
    }

    #[test]
    fn short_buffer_is_rejected() {
        let pixels = [0u8; 12];
        let layer = LayerExport {
            name: "broken",
            width: 2,
            height: 2,
            left: 0,
            top: 0,
            pixels: &pixels,
        };
        let err = LayerExporter::with_defaults().flatten(&[layer]).unwrap_err();
        assert!(matches!(err, ExportError::InvalidLayer { .. }));
    }

    #[test]
    fn transparent_layers_flatten_to_background() {
        let pixels = [0u8; 16];
        let layer = LayerExport {
            name: "empty",
            width: 2,
            height: 2,
            left: 0,
            top: 0,
            pixels: &pixels,
        };
        let exporter = LayerExporter::new(ExportConfig {
            background: Rgb::new(0, 0, 255),
            ..ExportConfig::default()
        });
        let flat = exporter.flatten(&[layer]).unwrap();
        assert!(flat.pixels().all(|p| p.0 == [0, 0, 255, 255]));
    }
}
