//! Whole-canvas snapshots.
//!
//! A snapshot stores every layer as a lossless PNG data URI, the same form a
//! browser canvas produces with `toDataURL()`. Decoding is staged: every
//! entry is decoded before any layer is touched.

use std::io::Cursor;

use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::{LayerStore, PaintError, PaintResult};

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// One layer's stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Store-assigned layer id, used to match entries to live layers.
    pub id: u64,
    /// Layer name at capture time, used when the layer must be recreated.
    pub name: String,
    /// PNG image as a base64 data URI.
    pub data_uri: String,
}

/// A snapshot entry decoded into a staging buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLayer {
    /// Layer id recorded at capture time.
    pub id: u64,
    /// Layer name recorded at capture time.
    pub name: String,
    /// Decoded pixels.
    pub buffer: RgbaImage,
}

/// Serialized pixel content of every layer at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// One entry per layer, bottom first.
    pub entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    /// Encode every layer of `store`.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::Encode`] if a layer cannot be PNG-encoded.
    pub fn capture(store: &LayerStore) -> PaintResult<Self> {
        let (width, height) = store.dimensions();
        let entries = store
            .layers()
            .iter()
            .map(|layer| {
                Ok(SnapshotEntry {
                    id: layer.id(),
                    name: layer.name.clone(),
                    data_uri: encode_data_uri(layer.buffer())?,
                })
            })
            .collect::<PaintResult<Vec<_>>>()?;
        Ok(Self {
            width,
            height,
            entries,
        })
    }

    /// Number of layers in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode every entry into a staged buffer.
    ///
    /// Nothing is returned unless all entries decode, so callers can apply
    /// the result in one step.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::DecodeFailure`] naming the first entry that is
    /// malformed or does not match the snapshot dimensions.
    pub fn decode_all(&self) -> PaintResult<Vec<DecodedLayer>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(layer, entry)| {
                let buffer = decode_data_uri(&entry.data_uri)
                    .map_err(|reason| PaintError::DecodeFailure { layer, reason })?;
                if buffer.dimensions() != (self.width, self.height) {
                    let (w, h) = buffer.dimensions();
                    return Err(PaintError::DecodeFailure {
                        layer,
                        reason: format!(
                            "image is {w}x{h}, canvas is {}x{}",
                            self.width, self.height
                        ),
                    });
                }
                Ok(DecodedLayer {
                    id: entry.id,
                    name: entry.name.clone(),
                    buffer,
                })
            })
            .collect()
    }
}

/// Encode a buffer as a `data:image/png;base64,...` URI.
///
/// # Errors
///
/// Returns [`PaintError::Encode`] if PNG encoding fails.
pub fn encode_data_uri(buffer: &RgbaImage) -> PaintResult<String> {
    let png = encode_png(buffer)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(png);
    Ok(format!("{PNG_DATA_URI_PREFIX}{encoded}"))
}

/// Encode a buffer as PNG bytes.
///
/// # Errors
///
/// Returns [`PaintError::Encode`] if PNG encoding fails.
pub fn encode_png(buffer: &RgbaImage) -> PaintResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    let (width, height) = buffer.dimensions();
    PngEncoder::new(&mut out)
        .write_image(buffer.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| PaintError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

/// Decode a base64 PNG data URI into an RGBA buffer.
fn decode_data_uri(uri: &str) -> Result<RgbaImage, String> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| "not a data URI".to_string())?;
    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| "invalid data URI: missing comma".to_string())?;
    if !metadata.contains(";base64") {
        return Err("data URI is not base64 encoded".to_string());
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| format!("invalid base64: {e}"))?;
    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .map_err(|e| format!("invalid PNG: {e}"))?;
    Ok(image.to_rgba8())
}
