//! Column descriptors
//!
//! Editability and value access are closures over the row data so that a
//! column can be read-only for some rows and writable for others. They are
//! evaluated on every query and never cached.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::types::CellValue;

/// Computes a cell value from row data instead of reading the field directly
///
/// `MemoryGrid` treats getter columns as read-only.
pub type ValueGetter<T> = Rc<dyn Fn(&T) -> CellValue>;

/// Turns a cell value into display text
pub type ValueFormatter = Rc<dyn Fn(&CellValue) -> String>;

/// Static or per-row editability
pub enum Editable<T> {
    Static(bool),
    PerRow(Rc<dyn Fn(&T) -> bool>),
}

impl<T> Editable<T> {
    /// Evaluate against the current row data
    pub fn evaluate(&self, data: &T) -> bool {
        match self {
            Editable::Static(editable) => *editable,
            Editable::PerRow(predicate) => predicate(data),
        }
    }
}

impl<T> Clone for Editable<T> {
    fn clone(&self) -> Self {
        match self {
            Editable::Static(editable) => Editable::Static(*editable),
            Editable::PerRow(predicate) => Editable::PerRow(Rc::clone(predicate)),
        }
    }
}

impl<T> fmt::Debug for Editable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Editable::Static(editable) => write!(f, "Static({})", editable),
            Editable::PerRow(_) => write!(f, "PerRow(..)"),
        }
    }
}

/// Side a column is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pinned {
    Left,
    Right,
}

/// Grid-agnostic description of a column
pub struct ColumnAdapter<T> {
    pub id: String,
    pub editable: Editable<T>,
    pub pinned: Option<Pinned>,
    pub width: Option<f32>,
    pub visible: bool,
    pub value_getter: Option<ValueGetter<T>>,
    pub value_formatter: Option<ValueFormatter>,
}

impl<T> ColumnAdapter<T> {
    /// A visible, read-only column reading the field named `id`
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            editable: Editable::Static(false),
            pinned: None,
            width: None,
            visible: true,
            value_getter: None,
            value_formatter: None,
        }
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = Editable::Static(editable);
        self
    }

    pub fn editable_when(mut self, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        self.editable = Editable::PerRow(Rc::new(predicate));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn pinned(mut self, side: Pinned) -> Self {
        self.pinned = Some(side);
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn value_getter(mut self, getter: impl Fn(&T) -> CellValue + 'static) -> Self {
        self.value_getter = Some(Rc::new(getter));
        self
    }

    pub fn value_formatter(mut self, formatter: impl Fn(&CellValue) -> String + 'static) -> Self {
        self.value_formatter = Some(Rc::new(formatter));
        self
    }

    pub fn is_editable_for(&self, data: &T) -> bool {
        self.editable.evaluate(data)
    }

    /// Display text for a value in this column
    pub fn format(&self, value: &CellValue) -> String {
        match &self.value_formatter {
            Some(formatter) => formatter(value),
            None => value.to_string(),
        }
    }
}

impl<T> Clone for ColumnAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            editable: self.editable.clone(),
            pinned: self.pinned,
            width: self.width,
            visible: self.visible,
            value_getter: self.value_getter.clone(),
            value_formatter: self.value_formatter.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnAdapter")
            .field("id", &self.id)
            .field("editable", &self.editable)
            .field("pinned", &self.pinned)
            .field("width", &self.width)
            .field("visible", &self.visible)
            .field("value_getter", &self.value_getter.is_some())
            .field("value_formatter", &self.value_formatter.is_some())
            .finish()
    }
}
