//! Snapshot-based linear undo/redo.
//!
//! The undo stack's top is always the current canvas state, and its bottom
//! entry is the state captured at initialization, which is never popped.
//! Any new capture invalidates the redo stack.

use crate::{Compositor, LayerStore, PaintResult, Snapshot};

/// Smallest accepted history depth: the initial state plus one action.
pub const MIN_HISTORY_DEPTH: usize = 2;

/// Two-stack undo/redo history over whole-canvas snapshots.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    max_depth: usize,
}

impl HistoryManager {
    /// Create an empty history holding at most `max_depth` undo entries.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(MIN_HISTORY_DEPTH),
        }
    }

    /// Snapshot every layer, push it as the current state and clear redo.
    ///
    /// When the undo stack grows past the depth limit, the oldest entry
    /// above the initial snapshot is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer cannot be encoded. History is unchanged
    /// in that case.
    pub fn capture(&mut self, store: &LayerStore) -> PaintResult<()> {
        let snapshot = Snapshot::capture(store)?;
        self.undo.push(snapshot);
        self.redo.clear();
        if self.undo.len() > self.max_depth {
            self.undo.remove(1);
        }
        tracing::debug!(
            "History capture: undo={} redo={}",
            self.undo.len(),
            self.redo.len()
        );
        Ok(())
    }

    /// Step back one state.
    ///
    /// Returns `Ok(false)` without doing anything when only the initial
    /// snapshot is left.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PaintError::DecodeFailure`] if the previous state
    /// cannot be decoded. The layers and both stacks are left as they were.
    pub fn undo(&mut self, store: &mut LayerStore, compositor: &mut Compositor) -> PaintResult<bool> {
        if self.undo.len() <= 1 {
            tracing::debug!("Undo ignored: at initial state");
            return Ok(false);
        }
        let Some(top) = self.undo.pop() else {
            return Ok(false);
        };
        self.redo.push(top);

        let restored = match self.undo.last() {
            Some(target) => Self::restore(target, store, compositor),
            None => Ok(()),
        };
        if let Err(e) = restored {
            tracing::warn!("Undo failed, history rolled back: {e}");
            if let Some(top) = self.redo.pop() {
                self.undo.push(top);
            }
            return Err(e);
        }

        tracing::debug!("Undo: undo={} redo={}", self.undo.len(), self.redo.len());
        Ok(true)
    }

    /// Re-apply the most recently undone state.
    ///
    /// Returns `Ok(false)` when there is nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PaintError::DecodeFailure`] if the state cannot be
    /// decoded. The layers and both stacks are left as they were.
    pub fn redo(&mut self, store: &mut LayerStore, compositor: &mut Compositor) -> PaintResult<bool> {
        let Some(snapshot) = self.redo.pop() else {
            tracing::debug!("Redo ignored: nothing to redo");
            return Ok(false);
        };

        if let Err(e) = Self::restore(&snapshot, store, compositor) {
            tracing::warn!("Redo failed, history rolled back: {e}");
            self.redo.push(snapshot);
            return Err(e);
        }
        self.undo.push(snapshot);

        tracing::debug!("Redo: undo={} redo={}", self.undo.len(), self.redo.len());
        Ok(true)
    }

    /// Replace every layer's pixels with the snapshot's and redraw once.
    ///
    /// All entries are decoded into staging buffers first. The layers are
    /// only touched after every decode has finished, and the composite is
    /// issued after that, so a partially restored frame is never drawn.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PaintError::DecodeFailure`] if any entry fails to
    /// decode. No layer is modified in that case.
    pub fn restore(
        snapshot: &Snapshot,
        store: &mut LayerStore,
        compositor: &mut Compositor,
    ) -> PaintResult<()> {
        let staged = snapshot.decode_all()?;
        store.replace_contents(staged);
        compositor.render(store.layers());
        Ok(())
    }

    /// Whether an undo would change anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    /// Whether a redo would change anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of entries on the undo stack, including the current state.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of entries on the redo stack.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// The snapshot describing the current state, if any was captured.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.undo.last()
    }

    /// The configured depth limit.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
