//! # Saorsa Paint Core
//!
//! Layered raster canvas with stabilized freehand strokes and
//! snapshot-based undo/redo. Compiles to WASM for the browser.
//!
//! ## Architecture
//!
//! ```text
//! pointer down ──▶ ToolController arms stroke
//! pointer move ──▶ smoother ──▶ raster::stroke_segment(active layer)
//!                                   │
//!                                   ▼
//!                  Compositor::render(all layers) ──▶ visible surface
//! pointer up   ──▶ HistoryManager::capture(Snapshot of every layer)
//! ```
//!
//! [`EditorSession`] owns every component and is the only entry point
//! the UI needs.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod command;
pub mod compositor;
pub mod config;
pub mod error;
pub mod history;
pub mod layer;
pub mod raster;
pub mod session;
pub mod smoother;
pub mod snapshot;
pub mod tool;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use color::Rgb;
pub use command::SessionCommand;
pub use compositor::Compositor;
pub use config::SessionConfig;
pub use error::{PaintError, PaintResult};
pub use history::HistoryManager;
pub use layer::{Layer, LayerListEntry, LayerStore};
pub use session::{EditorSession, LayerExport, LayerListListener};
pub use smoother::Point;
pub use snapshot::{DecodedLayer, Snapshot, SnapshotEntry};
pub use tool::{BrushParams, StrokeState, Tool, ToolController};

/// Paint core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
