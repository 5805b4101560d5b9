//! Export error types.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while encoding an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// There are no layers to export.
    #[error("Nothing to export: no layers")]
    Empty,

    /// A layer's pixel buffer does not match its declared geometry.
    #[error("Invalid layer '{name}': {reason}")]
    InvalidLayer {
        /// Layer name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Image encoding failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Document serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
