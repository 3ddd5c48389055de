//! Undo/redo history of terrain page snapshots.
//!
//! Every edit records a full copy of the page taken *before* the edit.
//! Undo swaps the current page with the newest snapshot and parks the
//! current state on the redo stack; redo does the reverse. Recording a new
//! edit always invalidates the redo stack.

pub mod stack;

pub use stack::BoundedStack;

use crate::terrain::TerrainPage;

/// Default number of entries kept in each direction
pub const DEFAULT_HISTORY_DEPTH: usize = 30;

/// A page snapshot with the label of the action it precedes
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub page: TerrainPage,
    pub label: String,
}

/// Linear undo/redo history over [`TerrainPage`] snapshots
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo: BoundedStack<HistoryEntry>,
    redo: BoundedStack<HistoryEntry>,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl HistoryManager {
    pub fn new(depth: usize) -> Self {
        Self {
            undo: BoundedStack::new(depth),
            redo: BoundedStack::new(depth),
        }
    }

    pub fn depth(&self) -> usize {
        self.undo.capacity()
    }

    /// Change how many entries are kept, dropping the oldest ones
    pub fn set_depth(&mut self, depth: usize) {
        self.undo.set_capacity(depth);
        self.redo.set_capacity(depth);
    }

    /// Record the state of `before` ahead of an edit labelled `label`.
    ///
    /// Clears the redo stack.
    pub fn record_edit(&mut self, before: TerrainPage, label: impl Into<String>) {
        let label = label.into();
        log::debug!("History: record '{}' ({} undo entries)", label, self.undo.len() + 1);
        if let Some(dropped) = self.undo.push(HistoryEntry { page: before, label }) {
            log::debug!("History: dropped oldest entry '{}'", dropped.label);
        }
        self.redo.clear();
    }

    /// Restore the newest snapshot into `current`.
    ///
    /// Returns the label of the undone action, or `None` when there is nothing
    /// to undo (in which case `current` is untouched).
    pub fn undo(&mut self, current: &mut TerrainPage) -> Option<String> {
        let entry = self.undo.pop()?;
        let previous = std::mem::replace(current, entry.page);
        self.redo.push(HistoryEntry {
            page: previous,
            label: entry.label.clone(),
        });
        Some(entry.label)
    }

    /// Re-apply the most recently undone action onto `current`.
    pub fn redo(&mut self, current: &mut TerrainPage) -> Option<String> {
        let entry = self.redo.pop()?;
        let previous = std::mem::replace(current, entry.page);
        self.undo.push(HistoryEntry {
            page: previous,
            label: entry.label.clone(),
        });
        Some(entry.label)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Label of the action [`undo`](Self::undo) would revert
    pub fn undo_label(&self) -> Option<&str> {
        self.undo.peek().map(|e| e.label.as_str())
    }

    /// Label of the action [`redo`](Self::redo) would re-apply
    pub fn redo_label(&self) -> Option<&str> {
        self.redo.peek().map(|e| e.label.as_str())
    }

    /// Undo labels, newest first
    pub fn undo_labels(&self) -> impl Iterator<Item = &str> {
        self.undo.iter().map(|e| e.label.as_str())
    }
}
