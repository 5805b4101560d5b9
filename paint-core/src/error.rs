//! Error types for paint operations.

use thiserror::Error;

/// Result type for paint operations.
pub type PaintResult<T> = Result<T, PaintError>;

/// Errors that can occur in paint operations.
///
/// Most editor operations are total: deleting the last layer or undoing
/// past the initial snapshot are silent no-ops, not errors.
#[derive(Debug, Error)]
pub enum PaintError {
    /// A layer index does not refer to an existing layer.
    #[error("Invalid layer index {index} (layer count {len})")]
    InvalidIndex {
        /// The rejected index.
        index: usize,
        /// Number of layers at the time of the call.
        len: usize,
    },

    /// A snapshot entry could not be decoded during restore.
    #[error("Failed to decode snapshot for layer {layer}: {reason}")]
    DecodeFailure {
        /// Index of the layer whose stored image failed.
        layer: usize,
        /// Decoder message.
        reason: String,
    },

    /// A layer buffer could not be encoded into a snapshot.
    #[error("Failed to encode layer: {0}")]
    Encode(String),

    /// A color string is not a `#rrggbb` or `#rgb` hex value.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Command or configuration JSON error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
