//! Undo/redo history of cell writes
//!
//! Writes are grouped into change sets. A change set is either a single write
//! or everything recorded between `begin_batch` and the matching `end_batch`,
//! so one fill or clear undoes in one step.

use super::types::{CellId, CellValue};

/// One recorded cell write
#[derive(Debug, Clone, PartialEq)]
pub struct CellChange {
    pub cell_id: CellId,
    pub old_value: CellValue,
    pub new_value: CellValue,
}

impl CellChange {
    pub fn new(cell_id: CellId, old_value: CellValue, new_value: CellValue) -> Self {
        Self {
            cell_id,
            old_value,
            new_value,
        }
    }

    /// The write that reverts this one
    pub fn inverse(&self) -> Self {
        Self {
            cell_id: self.cell_id.clone(),
            old_value: self.new_value.clone(),
            new_value: self.old_value.clone(),
        }
    }
}

/// Changes that undo and redo together
pub type ChangeSet = Vec<CellChange>;

/// Undo/redo stacks of change sets
#[derive(Debug, Clone)]
pub struct ChangeHistory {
    undo_stack: Vec<ChangeSet>,
    redo_stack: Vec<ChangeSet>,
    pending: ChangeSet,
    batch_depth: usize,
    max_size: usize,
}

impl ChangeHistory {
    pub fn new() -> Self {
        Self::with_max_size(1000)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending: Vec::new(),
            batch_depth: 0,
            max_size,
        }
    }

    /// Record a write; inside a batch it joins the pending change set
    pub fn record(&mut self, change: CellChange) {
        if self.batch_depth > 0 {
            self.pending.push(change);
        } else {
            self.push(vec![change]);
        }
    }

    /// Start grouping writes. Batches nest; only the outermost one commits.
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    pub fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 && !self.pending.is_empty() {
            let set = std::mem::take(&mut self.pending);
            self.push(set);
        }
    }

    fn push(&mut self, set: ChangeSet) {
        self.redo_stack.clear();
        self.undo_stack.push(set);

        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Changes that revert the latest set, in the order to apply them
    pub fn pop_undo(&mut self) -> Option<ChangeSet> {
        let set = self.undo_stack.pop()?;
        let inverse = set.iter().rev().map(CellChange::inverse).collect();
        self.redo_stack.push(set);
        Some(inverse)
    }

    /// Changes that re-apply the latest undone set
    pub fn pop_redo(&mut self) -> Option<ChangeSet> {
        let set = self.redo_stack.pop()?;
        self.undo_stack.push(set.clone());
        Some(set)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending.clear();
        self.batch_depth = 0;
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for ChangeHistory {
    fn default() -> Self {
        Self::new()
    }
}
