//! Selection statistics (status-bar style Count/Sum/Avg/Min/Max)

use std::fmt;

use serde::Serialize;

use super::selection::ordered_selection;
use crate::grid::{CellValue, GridAdapter};

/// Aggregates over selected rows × visible columns
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionInfo {
    /// Every cell in scope, numeric or not
    pub cell_count: usize,
    pub row_count: usize,
    pub sum: f64,
    /// `sum / numeric_count`, or `None` without numeric cells
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub numeric_count: usize,
}

impl SelectionInfo {
    pub fn is_empty(&self) -> bool {
        self.cell_count == 0
    }
}

impl fmt::Display for SelectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rows: {}  Count: {}", self.row_count, self.cell_count)?;
        if self.numeric_count > 0 {
            write!(f, "  Sum: {}", self.sum)?;
        }
        if let Some(average) = self.average {
            write!(f, "  Avg: {}", average)?;
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            write!(f, "  Min: {}  Max: {}", min, max)?;
        }
        Ok(())
    }
}

/// Running totals while walking the selection
#[derive(Debug, Default, Clone)]
pub struct StatsAccumulator {
    cell_count: usize,
    numeric_count: usize,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: &CellValue) {
        self.cell_count += 1;
        if let Some(n) = value.as_number() {
            self.numeric_count += 1;
            self.sum += n;
            self.min = Some(self.min.map_or(n, |m| m.min(n)));
            self.max = Some(self.max.map_or(n, |m| m.max(n)));
        }
    }

    pub fn finish(self, row_count: usize) -> SelectionInfo {
        let average = if self.numeric_count > 0 {
            Some(self.sum / self.numeric_count as f64)
        } else {
            None
        };
        SelectionInfo {
            cell_count: self.cell_count,
            row_count,
            sum: self.sum,
            average,
            min: self.min,
            max: self.max,
            numeric_count: self.numeric_count,
        }
    }
}

/// Compute statistics for the adapter's current selection
pub fn compute_selection_info<T, A>(adapter: &A) -> SelectionInfo
where
    A: GridAdapter<T> + ?Sized,
{
    let nodes = ordered_selection::<T, A>(adapter);
    let columns = adapter.get_visible_columns();

    let mut stats = StatsAccumulator::new();
    for node in &nodes {
        for column in &columns {
            stats.add(&adapter.get_cell_value(&node.cell(&column.id)));
        }
    }
    stats.finish(nodes.len())
}
