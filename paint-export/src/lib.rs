//! # Saorsa Paint Export
//!
//! Encoders consuming the per-layer views of an editing session.
//!
//! ```text
//! EditorSession::export_layers()
//!        │
//!        ├──▶ flattened PNG / JPEG over a background color
//!        └──▶ layered document (JSON manifest + PNG per layer)
//! ```
//!
//! The editor never depends on an export succeeding; failures are
//! returned to the caller and the canvas is untouched.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;

pub use error::{ExportError, ExportResult};
pub use export::{DocumentLayer, ExportConfig, ExportFormat, LayeredDocument, LayerExporter};
