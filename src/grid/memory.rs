//! In-memory `GridAdapter` implementation
//!
//! `MemoryGrid` owns its rows and columns and keeps a display order derived
//! from an optional filter and sort. It is the reference adapter used by the
//! CLI, tests and benchmarks, and a template for wrapping real table widgets.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::adapter::GridAdapter;
use super::column::ColumnAdapter;
use super::events::{CellValueChange, Listener, Listeners, SelectionChange, Subscription};
use super::history::{CellChange, ChangeHistory};
use super::types::{CellId, CellValue, EditingCellInfo, FocusedCell, RowNode};

/// Field access on row data
pub trait RowData {
    fn field(&self, field: &str) -> CellValue;
    fn set_field(&mut self, field: &str, value: CellValue);
}

/// A row as a map of field name to value
pub type Record = BTreeMap<String, CellValue>;

impl RowData for Record {
    fn field(&self, field: &str) -> CellValue {
        self.get(field).cloned().unwrap_or_default()
    }

    fn set_field(&mut self, field: &str, value: CellValue) {
        self.insert(field.to_string(), value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Ordering used for column sorts: numbers numerically, text lexically,
/// nulls after everything else
pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.to_string().cmp(&b.to_string()),
    }
}

#[derive(Debug, Clone)]
struct EditSession {
    cell_id: CellId,
    original: CellValue,
    buffer: String,
}

pub struct MemoryGrid<T> {
    rows: Vec<(String, T)>,
    /// Row ID -> index into `rows`
    row_lookup: HashMap<String, usize>,
    columns: Vec<ColumnAdapter<T>>,
    /// Indices into `rows` in display order
    display: Vec<usize>,
    /// Row ID -> display position, displayed rows only
    positions: HashMap<String, usize>,
    sort: Option<(String, SortDirection)>,
    filter: Option<Rc<dyn Fn(&T) -> bool>>,
    selected: HashSet<String>,
    focused: Option<CellId>,
    editing: Option<EditSession>,
    scrolled_row: Option<String>,
    scrolled_column: Option<String>,
    history: ChangeHistory,
    selection_listeners: Listeners<SelectionChange>,
    focus_listeners: Listeners<Option<FocusedCell>>,
    value_listeners: Listeners<CellValueChange>,
}

impl<T: RowData + Clone> MemoryGrid<T> {
    pub fn new(columns: Vec<ColumnAdapter<T>>) -> Self {
        Self {
            rows: Vec::new(),
            row_lookup: HashMap::new(),
            columns,
            display: Vec::new(),
            positions: HashMap::new(),
            sort: None,
            filter: None,
            selected: HashSet::new(),
            focused: None,
            editing: None,
            scrolled_row: None,
            scrolled_column: None,
            history: ChangeHistory::new(),
            selection_listeners: Listeners::new(),
            focus_listeners: Listeners::new(),
            value_listeners: Listeners::new(),
        }
    }

    pub fn with_rows<I, S>(columns: Vec<ColumnAdapter<T>>, rows: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
    {
        let mut grid = Self::new(columns);
        for (id, data) in rows {
            let id = id.into();
            if grid.row_lookup.contains_key(&id) {
                tracing::warn!("Duplicate row id {:?} ignored", id);
                continue;
            }
            grid.row_lookup.insert(id.clone(), grid.rows.len());
            grid.rows.push((id, data));
        }
        grid.rebuild_display();
        grid
    }

    /// Append a row; returns false if the ID is already taken
    pub fn push_row(&mut self, id: impl Into<String>, data: T) -> bool {
        let id = id.into();
        if self.row_lookup.contains_key(&id) {
            return false;
        }
        self.row_lookup.insert(id.clone(), self.rows.len());
        self.rows.push((id, data));
        self.rebuild_display();
        true
    }

    pub fn remove_row(&mut self, id: &str) -> Option<T> {
        let index = self.row_lookup.remove(id)?;
        let (_, data) = self.rows.remove(index);
        for slot in self.row_lookup.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        self.rebuild_display();
        Some(data)
    }

    pub fn row_data(&self, id: &str) -> Option<&T> {
        self.row_lookup.get(id).map(|&index| &self.rows[index].1)
    }

    /// Total rows including filtered-out ones
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn displayed_row_ids(&self) -> Vec<String> {
        self.display
            .iter()
            .map(|&index| self.rows[index].0.clone())
            .collect()
    }

    pub fn set_sort(&mut self, column_id: &str, direction: SortDirection) {
        self.sort = Some((column_id.to_string(), direction));
        self.rebuild_display();
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.rebuild_display();
    }

    pub fn set_filter(&mut self, predicate: impl Fn(&T) -> bool + 'static) {
        self.filter = Some(Rc::new(predicate));
        self.rebuild_display();
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.rebuild_display();
    }

    /// Re-apply sort and filter after data changed
    pub fn refresh(&mut self) {
        self.rebuild_display();
    }

    pub fn set_column_visible(&mut self, column_id: &str, visible: bool) {
        let Some(column) = self.columns.iter_mut().find(|c| c.id == column_id) else {
            return;
        };
        column.visible = visible;
        self.enforce_display_invariants();
    }

    pub fn history(&self) -> &ChangeHistory {
        &self.history
    }

    pub fn scrolled_row(&self) -> Option<&str> {
        self.scrolled_row.as_deref()
    }

    pub fn scrolled_column(&self) -> Option<&str> {
        self.scrolled_column.as_deref()
    }

    /// Pending text of the cell being edited
    pub fn edit_buffer(&self) -> Option<&str> {
        self.editing.as_ref().map(|session| session.buffer.as_str())
    }

    /// Replace the pending text of the cell being edited
    pub fn set_edit_buffer(&mut self, text: &str) {
        if let Some(session) = &mut self.editing {
            session.buffer = text.to_string();
        }
    }

    fn value_of(&self, data: &T, column_id: &str) -> CellValue {
        match self
            .columns
            .iter()
            .find(|c| c.id == column_id)
            .and_then(|c| c.value_getter.as_ref())
        {
            Some(getter) => getter(data),
            None => data.field(column_id),
        }
    }

    /// Columns read through a value getter have no field to write back to
    fn is_derived_column(&self, column_id: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.id == column_id && c.value_getter.is_some())
    }

    fn is_visible_column(&self, column_id: &str) -> bool {
        self.columns.iter().any(|c| c.id == column_id && c.visible)
    }

    fn is_displayed_cell(&self, cell: &CellId) -> bool {
        self.positions.contains_key(&cell.row_id) && self.is_visible_column(&cell.column_id)
    }

    fn selected_ids_in_display_order(&self) -> Vec<String> {
        self.display
            .iter()
            .map(|&index| &self.rows[index].0)
            .filter(|id| self.selected.contains(*id))
            .cloned()
            .collect()
    }

    fn emit_selection(&self) {
        let change = SelectionChange {
            selected_row_ids: self.selected_ids_in_display_order(),
        };
        self.selection_listeners.emit(&change);
    }

    fn rebuild_display(&mut self) {
        let mut display: Vec<usize> = (0..self.rows.len())
            .filter(|&index| {
                self.filter
                    .as_ref()
                    .map_or(true, |predicate| predicate(&self.rows[index].1))
            })
            .collect();

        if let Some((column_id, direction)) = &self.sort {
            display.sort_by(|&a, &b| {
                let ordering = compare_values(
                    &self.value_of(&self.rows[a].1, column_id),
                    &self.value_of(&self.rows[b].1, column_id),
                );
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        self.positions = display
            .iter()
            .enumerate()
            .map(|(position, &index)| (self.rows[index].0.clone(), position))
            .collect();
        self.display = display;
        self.enforce_display_invariants();
    }

    /// Drop selection, focus and edit state that points at hidden rows/columns
    fn enforce_display_invariants(&mut self) {
        let before = self.selected.len();
        let positions = &self.positions;
        self.selected.retain(|id| positions.contains_key(id));
        if self.selected.len() != before {
            tracing::debug!(
                "Dropped {} hidden rows from selection",
                before - self.selected.len()
            );
            self.emit_selection();
        }

        if let Some(focused) = &self.focused {
            if !self.is_displayed_cell(focused) {
                self.focused = None;
                self.focus_listeners.emit(&None);
            }
        }

        if let Some(session) = &self.editing {
            if !self.is_displayed_cell(&session.cell_id) {
                tracing::debug!("Edit on {} cancelled, cell no longer displayed", session.cell_id);
                self.editing = None;
            }
        }
    }

    /// Write a field and notify; returns false when nothing changed
    fn write_value(&mut self, cell: &CellId, value: CellValue, record: bool) -> bool {
        let Some(&index) = self.row_lookup.get(&cell.row_id) else {
            tracing::debug!("Write to unknown row {} ignored", cell.row_id);
            return false;
        };

        if self.is_derived_column(&cell.column_id) {
            tracing::debug!("Write to derived column {} ignored", cell.column_id);
            return false;
        }

        let old_value = self.value_of(&self.rows[index].1, &cell.column_id);
        if old_value == value {
            return false;
        }

        self.rows[index].1.set_field(&cell.column_id, value.clone());
        if record {
            self.history.record(CellChange::new(
                cell.clone(),
                old_value.clone(),
                value.clone(),
            ));
        }
        self.value_listeners.emit(&CellValueChange {
            cell_id: cell.clone(),
            old_value,
            new_value: value,
        });
        true
    }

    fn apply_history(&mut self, changes: Vec<CellChange>) {
        for change in changes {
            self.write_value(&change.cell_id, change.new_value, false);
        }
    }
}

impl<T: RowData + Clone> GridAdapter<T> for MemoryGrid<T> {
    fn get_selected_nodes(&self) -> Vec<RowNode<T>> {
        self.display
            .iter()
            .enumerate()
            .filter(|(_, &index)| self.selected.contains(&self.rows[index].0))
            .map(|(position, &index)| {
                let (id, data) = &self.rows[index];
                RowNode::new(id.clone(), data.clone(), position)
            })
            .collect()
    }

    fn get_selected_row_ids(&self) -> Vec<String> {
        self.selected_ids_in_display_order()
    }

    fn select_rows(&mut self, row_ids: &[&str]) {
        let next: HashSet<String> = row_ids
            .iter()
            .filter(|id| self.positions.contains_key(**id))
            .map(|id| id.to_string())
            .collect();

        if next != self.selected {
            self.selected = next;
            self.emit_selection();
        }
    }

    fn select_all(&mut self) {
        let next: HashSet<String> = self.positions.keys().cloned().collect();
        if next != self.selected {
            self.selected = next;
            self.emit_selection();
        }
    }

    fn deselect_all(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.emit_selection();
        }
    }

    fn get_focused_cell(&self) -> Option<FocusedCell> {
        let cell = self.focused.as_ref()?;
        let position = *self.positions.get(&cell.row_id)?;
        Some(FocusedCell::new(cell.clone(), position))
    }

    fn set_focused_cell(&mut self, cell: &CellId) {
        if !self.is_displayed_cell(cell) {
            tracing::debug!("Focus on {} ignored, cell not displayed", cell);
            return;
        }
        if self.focused.as_ref() == Some(cell) {
            return;
        }
        self.focused = Some(cell.clone());
        let focused = self.get_focused_cell();
        self.focus_listeners.emit(&focused);
    }

    fn get_row_index_by_id(&self, row_id: &str) -> Option<usize> {
        self.positions.get(row_id).copied()
    }

    fn get_row_id_by_index(&self, row_index: usize) -> Option<String> {
        self.display
            .get(row_index)
            .map(|&index| self.rows[index].0.clone())
    }

    fn get_row_node(&self, row_id: &str) -> Option<RowNode<T>> {
        let position = *self.positions.get(row_id)?;
        let index = self.display[position];
        let (id, data) = &self.rows[index];
        Some(RowNode::new(id.clone(), data.clone(), position))
    }

    fn get_displayed_row_count(&self) -> usize {
        self.display.len()
    }

    fn get_visible_columns(&self) -> Vec<ColumnAdapter<T>> {
        self.columns.iter().filter(|c| c.visible).cloned().collect()
    }

    fn get_all_columns(&self) -> Vec<ColumnAdapter<T>> {
        self.columns.clone()
    }

    fn get_column(&self, column_id: &str) -> Option<ColumnAdapter<T>> {
        self.columns.iter().find(|c| c.id == column_id).cloned()
    }

    fn get_cell_value(&self, cell: &CellId) -> CellValue {
        match self.row_data(&cell.row_id) {
            Some(data) => self.value_of(data, &cell.column_id),
            None => CellValue::Null,
        }
    }

    fn update_cell_value(&mut self, cell: &CellId, value: CellValue) {
        self.write_value(cell, value, true);
    }

    fn get_editing_cell(&self) -> Option<EditingCellInfo> {
        let session = self.editing.as_ref()?;
        let position = *self.positions.get(&session.cell_id.row_id)?;
        Some(EditingCellInfo::new(session.cell_id.clone(), position))
    }

    fn start_editing(&mut self, cell: &CellId, initial_key: Option<char>) {
        if !self.is_displayed_cell(cell) || !self.is_cell_editable(cell) {
            tracing::debug!("Cannot edit {}", cell);
            return;
        }

        if let Some(session) = &self.editing {
            if session.cell_id == *cell && initial_key.is_none() {
                return;
            }
            self.stop_editing(false);
        }

        let original = self.get_cell_value(cell);
        let buffer = match initial_key {
            Some(key) => key.to_string(),
            None => original.to_string(),
        };
        self.editing = Some(EditSession {
            cell_id: cell.clone(),
            original,
            buffer,
        });
    }

    fn stop_editing(&mut self, cancel: bool) {
        let Some(session) = self.editing.take() else {
            return;
        };
        if cancel {
            tracing::trace!("Edit on {} cancelled", session.cell_id);
            return;
        }
        if session.buffer != session.original.to_string() {
            self.write_value(
                &session.cell_id,
                CellValue::parse_input(&session.buffer),
                true,
            );
        }
    }

    fn is_cell_editable(&self, cell: &CellId) -> bool {
        if !self.positions.contains_key(&cell.row_id) {
            return false;
        }
        let (Some(data), Some(column)) = (
            self.row_data(&cell.row_id),
            self.columns.iter().find(|c| c.id == cell.column_id),
        ) else {
            return false;
        };
        column.value_getter.is_none() && column.is_editable_for(data)
    }

    fn scroll_to_row(&mut self, row_id: &str) {
        if self.positions.contains_key(row_id) {
            self.scrolled_row = Some(row_id.to_string());
        }
    }

    fn scroll_to_column(&mut self, column_id: &str) {
        if self.is_visible_column(column_id) {
            self.scrolled_column = Some(column_id.to_string());
        }
    }

    fn on_selection_change(&self, listener: Listener<SelectionChange>) -> Subscription {
        self.selection_listeners.subscribe(listener)
    }

    fn on_focus_change(&self, listener: Listener<Option<FocusedCell>>) -> Subscription {
        self.focus_listeners.subscribe(listener)
    }

    fn on_cell_value_change(&self, listener: Listener<CellValueChange>) -> Subscription {
        self.value_listeners.subscribe(listener)
    }

    fn begin_change_batch(&mut self) {
        self.history.begin_batch();
    }

    fn end_change_batch(&mut self) {
        self.history.end_batch();
    }

    fn undo(&mut self) -> bool {
        match self.history.pop_undo() {
            Some(changes) => {
                self.apply_history(changes);
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.history.pop_redo() {
            Some(changes) => {
                self.apply_history(changes);
                true
            }
            None => false,
        }
    }
}
