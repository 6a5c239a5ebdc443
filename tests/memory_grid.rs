//! Adapter contract tests for `MemoryGrid`
//!
//! Exercised through the `GridAdapter` trait, with both `Record` rows and a
//! typed row struct.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use cellgrid::engine::ExcelEngine;
use cellgrid::grid::{
    CellId, CellValue, CellValueChange, ColumnAdapter, GridAdapter, MemoryGrid, RowData,
    SortDirection,
};
use cellgrid::{ContainerId, MemoryClipboard};
use common::{cell, sample_grid};

// ========================================================================
// Typed rows
// ========================================================================

#[derive(Debug, Clone, PartialEq)]
struct Product {
    sku: String,
    name: String,
    stock: i64,
    discontinued: bool,
}

impl RowData for Product {
    fn field(&self, field: &str) -> CellValue {
        match field {
            "sku" => CellValue::text(&self.sku),
            "name" => CellValue::text(&self.name),
            "stock" => CellValue::Number(self.stock as f64),
            "discontinued" => CellValue::Bool(self.discontinued),
            _ => CellValue::Null,
        }
    }

    fn set_field(&mut self, field: &str, value: CellValue) {
        match field {
            "name" => self.name = value.to_string(),
            "stock" => {
                if let Some(n) = value.as_number() {
                    self.stock = n as i64;
                }
            }
            "discontinued" => self.discontinued = value == CellValue::Bool(true),
            _ => {}
        }
    }
}

fn product(sku: &str, name: &str, stock: i64, discontinued: bool) -> (String, Product) {
    (
        sku.to_string(),
        Product {
            sku: sku.to_string(),
            name: name.to_string(),
            stock,
            discontinued,
        },
    )
}

type ProductEngine = ExcelEngine<Product, MemoryGrid<Product>>;

fn product_grid() -> MemoryGrid<Product> {
    let columns = vec![
        ColumnAdapter::new("sku"),
        ColumnAdapter::new("name").editable(true),
        ColumnAdapter::new("stock").editable_when(|p: &Product| !p.discontinued),
    ];
    MemoryGrid::with_rows(
        columns,
        [
            product("A-1", "Bolt", 40, false),
            product("A-2", "Nut", 12, true),
            product("A-3", "Washer", 7, false),
        ],
    )
}

#[test]
fn test_typed_rows_fill_down_respects_row_predicate() {
    let clipboard = MemoryClipboard::new();
    let mut engine: ProductEngine =
        ExcelEngine::with_adapter(ContainerId(1), product_grid()).with_clipboard(clipboard);
    engine.adapter_mut().unwrap().select_all();
    engine.adapter_mut().unwrap().set_focused_cell(&CellId::new("A-1", "stock"));

    let updates = engine.fill_down();

    // A-2 is discontinued, so its stock stays put
    assert_eq!(updates.len(), 1);
    let grid = engine.adapter().unwrap();
    assert_eq!(grid.row_data("A-2").map(|p| p.stock), Some(12));
    assert_eq!(grid.row_data("A-3").map(|p| p.stock), Some(40));
}

#[test]
fn test_typed_rows_copy_and_paste() {
    let clipboard = MemoryClipboard::new();
    let mut engine: ProductEngine = ExcelEngine::with_adapter(ContainerId(1), product_grid())
        .with_clipboard(clipboard.clone());
    engine.adapter_mut().unwrap().select_rows(&["A-1", "A-3"]);

    let copied = engine.copy_to_clipboard();
    assert_eq!(copied.as_deref(), Some("A-1\tBolt\t40\nA-3\tWasher\t7"));

    engine.adapter_mut().unwrap().set_focused_cell(&CellId::new("A-3", "name"));
    clipboard.set_contents("Spring\t3");
    let updates = engine.paste_from_clipboard();
    assert_eq!(engine.apply_updates(&updates), 2);

    let grid = engine.adapter().unwrap();
    let washer = grid.row_data("A-3").unwrap();
    assert_eq!(washer.name, "Spring");
    assert_eq!(washer.stock, 3);
}

// ========================================================================
// Selection and navigation
// ========================================================================

#[test]
fn test_selection_reported_in_display_order() {
    let mut grid = sample_grid();
    grid.set_sort("value", SortDirection::Descending);
    grid.select_rows(&["1", "3", "missing"]);

    assert_eq!(grid.get_selected_row_ids(), vec!["3", "1"]);
    let nodes = grid.get_selected_nodes();
    assert_eq!(nodes[0].row_index, 0);
    assert_eq!(nodes[1].row_index, 2);
}

#[test]
fn test_filtered_rows_have_no_index() {
    let mut grid = sample_grid();
    grid.set_filter(|row| row.get("id") != Some(&CellValue::text("2")));

    assert_eq!(grid.get_displayed_row_count(), 2);
    assert_eq!(grid.get_row_index_by_id("2"), None);
    assert_eq!(grid.get_row_index_by_id("3"), Some(1));
    assert_eq!(grid.get_row_id_by_index(1).as_deref(), Some("3"));
    assert_eq!(grid.get_row_id_by_index(2), None);
    assert!(grid.get_row_node("2").is_none());

    grid.clear_filter();
    assert_eq!(grid.get_row_index_by_id("2"), Some(1));
}

#[test]
fn test_focus_follows_row_through_sort() {
    let mut grid = sample_grid();
    grid.set_focused_cell_by_index(0, "name");
    assert_eq!(
        grid.get_focused_cell().map(|f| f.cell_id),
        Some(cell("1", "name"))
    );

    grid.set_sort("value", SortDirection::Descending);
    let focused = grid.get_focused_cell().unwrap();
    assert_eq!(focused.cell_id, cell("1", "name"));
    assert_eq!(focused.row_index, 2);
}

#[test]
fn test_focus_dropped_when_row_filtered_out() {
    let mut grid = sample_grid();
    grid.set_focused_cell(&cell("2", "value"));
    grid.set_filter(|row| row.get("id") != Some(&CellValue::text("2")));

    assert_eq!(grid.get_focused_cell(), None);
}

#[test]
fn test_scroll_to_cell() {
    let mut grid = sample_grid();
    grid.scroll_to_cell(&cell("3", "value"));

    assert_eq!(grid.scrolled_row(), Some("3"));
    assert_eq!(grid.scrolled_column(), Some("value"));
}

// ========================================================================
// Editing
// ========================================================================

#[test]
fn test_start_editing_by_index() {
    let mut grid = sample_grid();
    grid.start_editing_by_index(2, "name", None);

    let info = grid.get_editing_cell().unwrap();
    assert_eq!(info.cell_id, cell("3", "name"));
    assert_eq!(info.row_index, 2);
    assert_eq!(grid.edit_buffer(), Some("Row 3"));
}

#[test]
fn test_commit_records_single_undo_step() {
    let mut grid = sample_grid();
    grid.start_editing(&cell("1", "value"), Some('9'));
    grid.stop_editing(false);
    assert_eq!(grid.get_cell_value(&cell("1", "value")), CellValue::Number(9.0));

    assert!(grid.undo());
    assert_eq!(grid.get_cell_value(&cell("1", "value")), CellValue::Number(100.0));
    assert!(!grid.undo());
    assert!(grid.redo());
    assert_eq!(grid.get_cell_value(&cell("1", "value")), CellValue::Number(9.0));
}

#[test]
fn test_unchanged_commit_writes_nothing() {
    let mut grid = sample_grid();
    grid.start_editing(&cell("2", "name"), None);
    grid.stop_editing(false);

    assert!(!grid.history().can_undo());
}

// ========================================================================
// Subscriptions
// ========================================================================

#[test]
fn test_value_listener_receives_old_and_new() {
    let mut grid = sample_grid();
    let seen: Rc<RefCell<Vec<CellValueChange>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let _subscription = grid.on_cell_value_change(Box::new(move |change| {
        sink.borrow_mut().push(change.clone())
    }));

    grid.update_cell_value(&cell("1", "name"), CellValue::text("First"));
    grid.update_cell_value(&cell("1", "name"), CellValue::text("First"));

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].cell_id, cell("1", "name"));
    assert_eq!(seen[0].old_value, CellValue::text("Row 1"));
    assert_eq!(seen[0].new_value, CellValue::text("First"));
}

#[test]
fn test_dropped_subscription_stops_notifications() {
    let mut grid = sample_grid();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let subscription = grid.on_selection_change(Box::new(move |_| *counter.borrow_mut() += 1));

    grid.select_all();
    assert_eq!(*count.borrow(), 1);

    drop(subscription);
    grid.deselect_all();
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_focus_listener_sees_cleared_focus() {
    let mut grid = sample_grid();
    let last = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&last);
    let _subscription = grid.on_focus_change(Box::new(move |focus| {
        *sink.borrow_mut() = Some(focus.clone())
    }));

    grid.set_focused_cell(&cell("2", "name"));
    assert_eq!(
        last.borrow().clone().flatten().map(|f| f.cell_id),
        Some(cell("2", "name"))
    );

    grid.remove_row("2");
    assert_eq!(*last.borrow(), Some(None));
}
