//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use cellgrid::engine::{ContainerId, EngineCallbacks, ExcelEngine, KeyEvent};
use cellgrid::grid::{
    CellId, CellUpdate, CellValue, CellValueChange, ColumnAdapter, EditingCellInfo, FocusedCell,
    GridAdapter, Listener, MemoryGrid, Record, RowNode, SelectionChange, Subscription,
};
use cellgrid::keymap::Keystroke;
use cellgrid::{GridConfig, MemoryClipboard};

pub const CONTAINER: ContainerId = ContainerId(7);

/// Build a record from field/value pairs
pub fn record(fields: &[(&str, CellValue)]) -> Record {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// Columns `id` (read-only), `name`, `value`
pub fn sample_columns() -> Vec<ColumnAdapter<Record>> {
    vec![
        ColumnAdapter::new("id"),
        ColumnAdapter::new("name").editable(true),
        ColumnAdapter::new("value").editable(true),
    ]
}

/// Three rows: `Row 1`/100, `Row 2`/200, `Row 3`/300 with IDs "1".."3"
pub fn sample_grid() -> MemoryGrid<Record> {
    let rows = (1..=3).map(|i| {
        (
            i.to_string(),
            record(&[
                ("id", CellValue::text(i.to_string())),
                ("name", CellValue::text(format!("Row {}", i))),
                ("value", CellValue::Number(i as f64 * 100.0)),
            ]),
        )
    });
    MemoryGrid::with_rows(sample_columns(), rows)
}

pub fn cell(row_id: &str, column_id: &str) -> CellId {
    CellId::new(row_id, column_id)
}

// ============================================================================
// Call-recording adapter
// ============================================================================

/// Adapter calls observed by `RecordingGrid`
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SelectRows(Vec<String>),
    SelectAll,
    DeselectAll,
    SetFocusedCell(CellId),
    UpdateCellValue(CellId, CellValue),
    StartEditing(CellId, Option<char>),
    StopEditing(bool),
    BeginBatch,
    EndBatch,
    Undo,
    Redo,
}

/// `MemoryGrid` wrapper that logs every mutating call
pub struct RecordingGrid {
    pub inner: MemoryGrid<Record>,
    pub calls: Vec<Call>,
}

impl RecordingGrid {
    pub fn new(inner: MemoryGrid<Record>) -> Self {
        Self {
            inner,
            calls: Vec::new(),
        }
    }

    pub fn sample() -> Self {
        Self::new(sample_grid())
    }

    pub fn writes(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::UpdateCellValue(..)))
            .collect()
    }

    pub fn called(&self, call: &Call) -> bool {
        self.calls.contains(call)
    }

    pub fn stop_editing_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::StopEditing(_)))
            .count()
    }

    pub fn clear_log(&mut self) {
        self.calls.clear();
    }
}

impl GridAdapter<Record> for RecordingGrid {
    fn get_selected_nodes(&self) -> Vec<RowNode<Record>> {
        self.inner.get_selected_nodes()
    }

    fn select_rows(&mut self, row_ids: &[&str]) {
        self.calls.push(Call::SelectRows(
            row_ids.iter().map(|id| id.to_string()).collect(),
        ));
        self.inner.select_rows(row_ids);
    }

    fn select_all(&mut self) {
        self.calls.push(Call::SelectAll);
        self.inner.select_all();
    }

    fn deselect_all(&mut self) {
        self.calls.push(Call::DeselectAll);
        self.inner.deselect_all();
    }

    fn get_focused_cell(&self) -> Option<FocusedCell> {
        self.inner.get_focused_cell()
    }

    fn set_focused_cell(&mut self, cell: &CellId) {
        self.calls.push(Call::SetFocusedCell(cell.clone()));
        self.inner.set_focused_cell(cell);
    }

    fn get_row_index_by_id(&self, row_id: &str) -> Option<usize> {
        self.inner.get_row_index_by_id(row_id)
    }

    fn get_row_id_by_index(&self, row_index: usize) -> Option<String> {
        self.inner.get_row_id_by_index(row_index)
    }

    fn get_row_node(&self, row_id: &str) -> Option<RowNode<Record>> {
        self.inner.get_row_node(row_id)
    }

    fn get_displayed_row_count(&self) -> usize {
        self.inner.get_displayed_row_count()
    }

    fn get_visible_columns(&self) -> Vec<ColumnAdapter<Record>> {
        self.inner.get_visible_columns()
    }

    fn get_all_columns(&self) -> Vec<ColumnAdapter<Record>> {
        self.inner.get_all_columns()
    }

    fn get_cell_value(&self, cell: &CellId) -> CellValue {
        self.inner.get_cell_value(cell)
    }

    fn update_cell_value(&mut self, cell: &CellId, value: CellValue) {
        self.calls
            .push(Call::UpdateCellValue(cell.clone(), value.clone()));
        self.inner.update_cell_value(cell, value);
    }

    fn get_editing_cell(&self) -> Option<EditingCellInfo> {
        self.inner.get_editing_cell()
    }

    fn start_editing(&mut self, cell: &CellId, initial_key: Option<char>) {
        self.calls
            .push(Call::StartEditing(cell.clone(), initial_key));
        self.inner.start_editing(cell, initial_key);
    }

    fn stop_editing(&mut self, cancel: bool) {
        self.calls.push(Call::StopEditing(cancel));
        self.inner.stop_editing(cancel);
    }

    fn is_cell_editable(&self, cell: &CellId) -> bool {
        self.inner.is_cell_editable(cell)
    }

    fn scroll_to_row(&mut self, row_id: &str) {
        self.inner.scroll_to_row(row_id);
    }

    fn scroll_to_column(&mut self, column_id: &str) {
        self.inner.scroll_to_column(column_id);
    }

    fn on_selection_change(&self, listener: Listener<SelectionChange>) -> Subscription {
        self.inner.on_selection_change(listener)
    }

    fn on_focus_change(&self, listener: Listener<Option<FocusedCell>>) -> Subscription {
        self.inner.on_focus_change(listener)
    }

    fn on_cell_value_change(&self, listener: Listener<CellValueChange>) -> Subscription {
        self.inner.on_cell_value_change(listener)
    }

    fn begin_change_batch(&mut self) {
        self.calls.push(Call::BeginBatch);
        self.inner.begin_change_batch();
    }

    fn end_change_batch(&mut self) {
        self.calls.push(Call::EndBatch);
        self.inner.end_change_batch();
    }

    fn undo(&mut self) -> bool {
        self.calls.push(Call::Undo);
        self.inner.undo()
    }

    fn redo(&mut self) -> bool {
        self.calls.push(Call::Redo);
        self.inner.redo()
    }
}

// ============================================================================
// Engine builders
// ============================================================================

pub type TestEngine = ExcelEngine<Record, RecordingGrid>;

/// Updates received by each callback, in order
#[derive(Debug, Default, Clone)]
pub struct CallbackLog {
    pub pasted: Rc<RefCell<Vec<Vec<CellUpdate>>>>,
    pub filled: Rc<RefCell<Vec<Vec<CellUpdate>>>>,
    pub cleared: Rc<RefCell<Vec<Vec<CellUpdate>>>>,
}

impl CallbackLog {
    pub fn callbacks(&self) -> EngineCallbacks {
        let pasted = Rc::clone(&self.pasted);
        let filled = Rc::clone(&self.filled);
        let cleared = Rc::clone(&self.cleared);
        EngineCallbacks::new()
            .on_paste(move |updates| pasted.borrow_mut().push(updates.to_vec()))
            .on_cells_filled(move |updates| filled.borrow_mut().push(updates.to_vec()))
            .on_cells_cleared(move |updates| cleared.borrow_mut().push(updates.to_vec()))
    }

    pub fn paste_count(&self) -> usize {
        self.pasted.borrow().len()
    }

    pub fn fill_count(&self) -> usize {
        self.filled.borrow().len()
    }

    pub fn clear_count(&self) -> usize {
        self.cleared.borrow().len()
    }

    pub fn last_paste(&self) -> Vec<CellUpdate> {
        self.pasted.borrow().last().cloned().unwrap_or_default()
    }
}

/// Engine over the sample grid with an in-memory clipboard and logged callbacks
pub struct Harness {
    pub engine: TestEngine,
    pub clipboard: MemoryClipboard,
    pub log: CallbackLog,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_grid(RecordingGrid::sample(), GridConfig::default())
    }

    pub fn read_only() -> Self {
        Self::with_grid(RecordingGrid::sample(), GridConfig::read_only())
    }

    pub fn with_grid(grid: RecordingGrid, config: GridConfig) -> Self {
        let clipboard = MemoryClipboard::new();
        let log = CallbackLog::default();
        let engine = ExcelEngine::with_adapter(CONTAINER, grid)
            .with_config(config)
            .with_clipboard(clipboard.clone())
            .with_callbacks(log.callbacks());
        Self {
            engine,
            clipboard,
            log,
        }
    }

    pub fn grid(&self) -> &RecordingGrid {
        self.engine.adapter().expect("adapter attached")
    }

    pub fn grid_mut(&mut self) -> &mut RecordingGrid {
        self.engine.adapter_mut().expect("adapter attached")
    }

    pub fn select(&mut self, ids: &[&str]) {
        self.grid_mut().select_rows(ids);
    }

    pub fn focus(&mut self, row_id: &str, column_id: &str) {
        self.grid_mut().set_focused_cell(&cell(row_id, column_id));
    }

    pub fn value(&self, row_id: &str, column_id: &str) -> CellValue {
        self.grid().get_cell_value(&cell(row_id, column_id))
    }

    pub fn press(&mut self, keystroke: Keystroke) -> cellgrid::engine::KeyOutcome {
        self.engine.handle_key(&KeyEvent::new(CONTAINER, keystroke))
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
