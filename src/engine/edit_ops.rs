//! Operations that write through the adapter: fill down, clear, apply

use super::selection::{ordered_selection, target_cells};
use crate::grid::{CellId, CellUpdate, CellValue, GridAdapter};

/// Copy the first selected row's visible values into the other selected rows
///
/// Returns `None` without touching the adapter's values when fewer than two
/// rows are selected. Cells that are read-only or already equal are skipped.
pub(crate) fn fill_down<T, A>(adapter: &mut A) -> Option<Vec<CellUpdate>>
where
    A: GridAdapter<T> + ?Sized,
{
    let nodes = ordered_selection::<T, A>(adapter);
    let (source, targets) = match nodes.split_first() {
        Some((source, targets)) if !targets.is_empty() => (source, targets),
        _ => {
            tracing::debug!("Fill down needs at least two selected rows");
            return None;
        }
    };

    let columns = adapter.get_visible_columns();
    let mut updates = Vec::new();

    adapter.begin_change_batch();
    for column in &columns {
        let value = adapter.get_cell_value(&source.cell(&column.id));
        for target in targets {
            let cell = target.cell(&column.id);
            if !adapter.is_cell_editable(&cell) {
                tracing::trace!("Fill skips read-only cell {}", cell);
                continue;
            }
            let old_value = adapter.get_cell_value(&cell);
            if old_value == value {
                continue;
            }
            adapter.update_cell_value(&cell, value.clone());
            updates.push(CellUpdate::new(&cell, old_value, value.clone()));
        }
    }
    adapter.end_change_batch();

    tracing::debug!(
        "Filled {} cells from row {} into {} rows",
        updates.len(),
        source.id,
        targets.len()
    );
    Some(updates)
}

/// Set every editable target cell to null
///
/// Targets are selected rows × visible columns, or the focused cell when no
/// rows are selected. Returns `None` when there is no target at all.
pub(crate) fn clear_cells<T, A>(adapter: &mut A) -> Option<Vec<CellUpdate>>
where
    A: GridAdapter<T> + ?Sized,
{
    let targets = target_cells::<T, A>(adapter);
    if targets.is_empty() {
        tracing::debug!("Nothing selected or focused to clear");
        return None;
    }

    let mut updates = Vec::new();
    adapter.begin_change_batch();
    for cell in &targets {
        if !adapter.is_cell_editable(cell) {
            tracing::trace!("Clear skips read-only cell {}", cell);
            continue;
        }
        let old_value = adapter.get_cell_value(cell);
        if old_value.is_null() {
            continue;
        }
        adapter.update_cell_value(cell, CellValue::Null);
        updates.push(CellUpdate::new(cell, old_value, CellValue::Null));
    }
    adapter.end_change_batch();

    Some(updates)
}

/// Commit host-approved updates in one batch
///
/// Editability is checked again at commit time. Text values are read the way
/// a typed edit is (see [`committed_value`]). Returns the number of cells
/// whose value changed.
pub(crate) fn apply_updates<T, A>(adapter: &mut A, updates: &[CellUpdate]) -> usize
where
    A: GridAdapter<T> + ?Sized,
{
    let mut applied = 0;
    adapter.begin_change_batch();
    for update in updates {
        let cell: CellId = update.cell_id();
        if !adapter.is_cell_editable(&cell) {
            tracing::debug!("Update to {} rejected, cell not editable", cell);
            continue;
        }
        let current = adapter.get_cell_value(&cell);
        let value = committed_value(&current, &update.new_value);
        if current == value {
            continue;
        }
        adapter.update_cell_value(&cell, value);
        applied += 1;
    }
    adapter.end_change_batch();
    applied
}

/// Value to store for a proposed update
///
/// Text that already displays as the current value keeps the current value,
/// so pasting copied cells back is a no-op. Other text goes through
/// `CellValue::parse_input`, matching a committed edit.
pub(crate) fn committed_value(current: &CellValue, proposed: &CellValue) -> CellValue {
    match proposed {
        CellValue::Text(text) if current.to_string() == *text => current.clone(),
        CellValue::Text(text) => CellValue::parse_input(text),
        other => other.clone(),
    }
}
