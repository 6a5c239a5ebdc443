//! Copy and paste against a grid adapter
//!
//! Paste never writes: it turns clipboard text into proposed `CellUpdate`s
//! anchored at the focused cell.

use super::selection::ordered_selection;
use crate::grid::{CellId, CellUpdate, CellValue, FocusedCell, GridAdapter};
use crate::tsv;

/// Clipboard text for the current selection or focused cell
///
/// Selected rows × visible columns in display order. Without a selection,
/// the focused cell's formatted value. `None` when there is nothing to copy.
pub(crate) fn copy_text<T, A>(adapter: &A, formatted: bool) -> Option<String>
where
    A: GridAdapter<T> + ?Sized,
{
    let nodes = ordered_selection::<T, A>(adapter);

    if nodes.is_empty() {
        let focused = adapter.get_focused_cell()?;
        let text = adapter.get_formatted_value(&focused.cell_id);
        return Some(tsv::sanitize_cell(&text).into_owned());
    }

    let columns = adapter.get_visible_columns();
    let rows = nodes.iter().map(|node| {
        columns
            .iter()
            .map(|column| {
                let cell = node.cell(&column.id);
                if formatted {
                    adapter.get_formatted_value(&cell)
                } else {
                    adapter.get_cell_value(&cell).to_string()
                }
            })
            .collect::<Vec<_>>()
    });

    tracing::debug!(
        "Copying {} rows x {} columns",
        nodes.len(),
        columns.len()
    );
    Some(tsv::serialize_rows(rows))
}

/// Map parsed clipboard rows onto the grid starting at `anchor`
///
/// Clipboard cells map positionally: column offset `c` lands in the `c`-th
/// visible column after the anchor's column, row offset `r` in the `r`-th
/// displayed row after the anchor's row. A destination that is not editable
/// still consumes its clipboard value but produces no update. Values past the
/// last row or column are dropped.
pub(crate) fn paste_updates<T, A>(
    adapter: &A,
    anchor: &FocusedCell,
    rows: &[Vec<String>],
) -> Vec<CellUpdate>
where
    A: GridAdapter<T> + ?Sized,
{
    let columns = adapter.get_visible_columns();
    let Some(start_col) = columns.iter().position(|c| c.id == anchor.column_id) else {
        tracing::debug!("Paste anchor column {} not visible", anchor.column_id);
        return Vec::new();
    };
    let Some(start_row) = adapter.get_row_index_by_id(&anchor.cell_id.row_id) else {
        tracing::debug!("Paste anchor row {} not displayed", anchor.cell_id.row_id);
        return Vec::new();
    };

    let mut updates = Vec::new();
    for (row_offset, values) in rows.iter().enumerate() {
        let Some(row_id) = adapter.get_row_id_by_index(start_row + row_offset) else {
            break;
        };

        for (col_offset, text) in values.iter().enumerate() {
            let Some(column) = columns.get(start_col + col_offset) else {
                break;
            };
            let cell = CellId::new(row_id.clone(), column.id.clone());
            if !adapter.is_cell_editable(&cell) {
                tracing::trace!("Paste skips read-only cell {}", cell);
                continue;
            }
            let old_value = adapter.get_cell_value(&cell);
            updates.push(CellUpdate::new(&cell, old_value, CellValue::text(text.as_str())));
        }
    }
    updates
}
