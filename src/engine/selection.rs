//! Resolving the current selection into display-ordered targets

use crate::grid::{CellId, GridAdapter, RowNode};

/// Selected rows sorted by their current display position
///
/// Positions are re-resolved through `get_row_index_by_id` rather than
/// trusting `RowNode::row_index`; rows that are no longer displayed drop out.
pub(crate) fn ordered_selection<T, A>(adapter: &A) -> Vec<RowNode<T>>
where
    A: GridAdapter<T> + ?Sized,
{
    let mut nodes: Vec<RowNode<T>> = adapter
        .get_selected_nodes()
        .into_iter()
        .filter_map(|mut node| {
            node.row_index = adapter.get_row_index_by_id(&node.id)?;
            Some(node)
        })
        .collect();
    nodes.sort_by_key(|node| node.row_index);
    nodes
}

/// Cells an operation on "the selection" applies to
///
/// Selected rows × visible columns, or the focused cell when no rows are
/// selected. Empty when there is neither.
pub(crate) fn target_cells<T, A>(adapter: &A) -> Vec<CellId>
where
    A: GridAdapter<T> + ?Sized,
{
    let nodes = ordered_selection::<T, A>(adapter);
    if nodes.is_empty() {
        return adapter
            .get_focused_cell()
            .map(|focused| vec![focused.cell_id])
            .unwrap_or_default();
    }

    let columns = adapter.get_visible_columns();
    nodes
        .iter()
        .flat_map(|node| columns.iter().map(move |column| node.cell(&column.id)))
        .collect()
}
