//! The `GridAdapter` capability trait
//!
//! Any concrete table widget is wrapped by implementing this trait. The
//! interaction engine only ever talks to a grid through it.
//!
//! # Contract
//!
//! - Rows are addressed by stable IDs. Indices returned here are display
//!   positions at the time of the call and may change after sort/filter.
//! - `None` from an index/ID conversion means "not currently displayable",
//!   never an error.
//! - Value writes notify `on_cell_value_change` subscribers no matter who
//!   made them, at most once per subscriber per change.

use super::column::ColumnAdapter;
use super::events::{CellValueChange, Listener, SelectionChange, Subscription};
use super::types::{CellId, CellValue, EditingCellInfo, FocusedCell, RowNode};

pub trait GridAdapter<T> {
    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selected rows in display order
    fn get_selected_nodes(&self) -> Vec<RowNode<T>>;

    /// Data of the selected rows in display order
    fn get_selected_rows(&self) -> Vec<T> {
        self.get_selected_nodes()
            .into_iter()
            .map(|node| node.data)
            .collect()
    }

    /// IDs of the selected rows in display order
    fn get_selected_row_ids(&self) -> Vec<String> {
        self.get_selected_nodes()
            .into_iter()
            .map(|node| node.id)
            .collect()
    }

    /// Replace the selection with exactly these rows; unknown IDs are ignored
    fn select_rows(&mut self, row_ids: &[&str]);

    /// Select every displayed row (hidden/filtered rows are not selected)
    fn select_all(&mut self);

    fn deselect_all(&mut self);

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    fn get_focused_cell(&self) -> Option<FocusedCell>;

    /// Move focus; no-op if the cell is not currently displayed
    fn set_focused_cell(&mut self, cell: &CellId);

    /// Positional convenience, resolved through the row-at-index lookup
    fn set_focused_cell_by_index(&mut self, row_index: usize, column_id: &str) {
        if let Some(row_id) = self.get_row_id_by_index(row_index) {
            self.set_focused_cell(&CellId::new(row_id, column_id));
        }
    }

    // ------------------------------------------------------------------
    // ID / index conversion
    // ------------------------------------------------------------------

    fn get_row_index_by_id(&self, row_id: &str) -> Option<usize>;

    fn get_row_id_by_index(&self, row_index: usize) -> Option<String>;

    /// A displayed row by ID
    fn get_row_node(&self, row_id: &str) -> Option<RowNode<T>>;

    fn get_displayed_row_count(&self) -> usize;

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    /// Visible columns in display order
    fn get_visible_columns(&self) -> Vec<ColumnAdapter<T>>;

    /// All columns including hidden ones
    fn get_all_columns(&self) -> Vec<ColumnAdapter<T>>;

    fn get_column(&self, column_id: &str) -> Option<ColumnAdapter<T>> {
        self.get_all_columns()
            .into_iter()
            .find(|column| column.id == column_id)
    }

    // ------------------------------------------------------------------
    // Cell values
    // ------------------------------------------------------------------

    fn get_cell_value(&self, cell: &CellId) -> CellValue;

    /// Value passed through the column formatter
    fn get_formatted_value(&self, cell: &CellId) -> String {
        let value = self.get_cell_value(cell);
        match self.get_column(&cell.column_id) {
            Some(column) => column.format(&value),
            None => value.to_string(),
        }
    }

    fn update_cell_value(&mut self, cell: &CellId, value: CellValue);

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    fn is_editing(&self) -> bool {
        self.get_editing_cell().is_some()
    }

    fn get_editing_cell(&self) -> Option<EditingCellInfo>;

    /// Enter edit mode on a cell, committing any edit already in progress
    fn start_editing(&mut self, cell: &CellId, initial_key: Option<char>);

    fn start_editing_by_index(
        &mut self,
        row_index: usize,
        column_id: &str,
        initial_key: Option<char>,
    ) {
        if let Some(row_id) = self.get_row_id_by_index(row_index) {
            self.start_editing(&CellId::new(row_id, column_id), initial_key);
        }
    }

    /// Leave edit mode; `cancel` discards the pending value
    fn stop_editing(&mut self, cancel: bool);

    /// Editability against the row's current data
    fn is_cell_editable(&self, cell: &CellId) -> bool {
        let Some(node) = self.get_row_node(&cell.row_id) else {
            return false;
        };
        self.get_column(&cell.column_id)
            .map(|column| column.is_editable_for(&node.data))
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Scrolling (best effort)
    // ------------------------------------------------------------------

    fn scroll_to_row(&mut self, row_id: &str);

    fn scroll_to_column(&mut self, column_id: &str);

    fn scroll_to_cell(&mut self, cell: &CellId) {
        self.scroll_to_row(&cell.row_id);
        self.scroll_to_column(&cell.column_id);
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    fn on_selection_change(&self, listener: Listener<SelectionChange>) -> Subscription;

    fn on_focus_change(&self, listener: Listener<Option<FocusedCell>>) -> Subscription;

    fn on_cell_value_change(&self, listener: Listener<CellValueChange>) -> Subscription;

    // ------------------------------------------------------------------
    // History (optional capability)
    // ------------------------------------------------------------------

    /// Group the following writes into one undo step
    fn begin_change_batch(&mut self) {}

    fn end_change_batch(&mut self) {}

    /// Returns false when there is nothing to undo or no history support
    fn undo(&mut self) -> bool {
        false
    }

    fn redo(&mut self) -> bool {
        false
    }
}
