//! Identity and value types shared by adapters and the interaction engine
//!
//! Rows and columns are addressed by stable string IDs. Display indices are
//! carried alongside for convenience but are never used as keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of a single cell by stable row and column IDs
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    pub row_id: String,
    pub column_id: String,
}

impl CellId {
    pub fn new(row_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            column_id: column_id.into(),
        }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row_id, self.column_id)
    }
}

/// A row as seen by the engine at query time
///
/// `row_index` is the display position when the node was produced. It goes
/// stale after any sort or filter and must be re-resolved through
/// `GridAdapter::get_row_index_by_id` before being relied on.
#[derive(Debug, Clone, PartialEq)]
pub struct RowNode<T> {
    pub id: String,
    pub data: T,
    pub row_index: usize,
}

impl<T> RowNode<T> {
    pub fn new(id: impl Into<String>, data: T, row_index: usize) -> Self {
        Self {
            id: id.into(),
            data,
            row_index,
        }
    }

    /// Cell address of this row in the given column
    pub fn cell(&self, column_id: &str) -> CellId {
        CellId::new(self.id.clone(), column_id)
    }
}

/// The cell currently receiving keyboard input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusedCell {
    pub cell_id: CellId,
    pub row_index: usize,
    pub column_id: String,
}

impl FocusedCell {
    pub fn new(cell_id: CellId, row_index: usize) -> Self {
        let column_id = cell_id.column_id.clone();
        Self {
            cell_id,
            row_index,
            column_id,
        }
    }
}

/// The cell currently in edit mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditingCellInfo {
    pub cell_id: CellId,
    pub row_index: usize,
    pub column_id: String,
}

impl EditingCellInfo {
    pub fn new(cell_id: CellId, row_index: usize) -> Self {
        let column_id = cell_id.column_id.clone();
        Self {
            cell_id,
            row_index,
            column_id,
        }
    }
}

/// A loosely typed cell value
///
/// Deserializes untagged so JSON rows (`{"id": "1", "value": 100}`) map
/// directly onto cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric reading of the value, if it has one
    ///
    /// Finite numbers and text that parses as a finite number qualify.
    /// Empty text, booleans and null do not.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }

    /// Interpret user-typed text: empty becomes null, numbers become numbers
    pub fn parse_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(input.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// A proposed or applied change to one cell, handed to host callbacks
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellUpdate {
    pub row_id: String,
    pub field: String,
    pub old_value: CellValue,
    pub new_value: CellValue,
}

impl CellUpdate {
    pub fn new(cell: &CellId, old_value: CellValue, new_value: CellValue) -> Self {
        Self {
            row_id: cell.row_id.clone(),
            field: cell.column_id.clone(),
            old_value,
            new_value,
        }
    }

    pub fn cell_id(&self) -> CellId {
        CellId::new(self.row_id.clone(), self.field.clone())
    }
}
