//! Host callbacks fired after grid operations

use std::fmt;

use crate::grid::CellUpdate;

type UpdateCallback = Box<dyn FnMut(&[CellUpdate])>;

/// Optional host hooks
///
/// `on_paste` receives proposed updates the host is expected to commit.
/// `on_cells_filled` and `on_cells_cleared` receive writes already made
/// through the adapter. Each fires at most once per operation.
///
/// Fill and clear skip cells that already hold the target value, so their
/// payloads list only cells that changed and may be empty.
#[derive(Default)]
pub struct EngineCallbacks {
    on_paste: Option<UpdateCallback>,
    on_cells_filled: Option<UpdateCallback>,
    on_cells_cleared: Option<UpdateCallback>,
}

impl EngineCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_paste(mut self, callback: impl FnMut(&[CellUpdate]) + 'static) -> Self {
        self.on_paste = Some(Box::new(callback));
        self
    }

    pub fn on_cells_filled(mut self, callback: impl FnMut(&[CellUpdate]) + 'static) -> Self {
        self.on_cells_filled = Some(Box::new(callback));
        self
    }

    pub fn on_cells_cleared(mut self, callback: impl FnMut(&[CellUpdate]) + 'static) -> Self {
        self.on_cells_cleared = Some(Box::new(callback));
        self
    }

    pub(crate) fn pasted(&mut self, updates: &[CellUpdate]) {
        if let Some(callback) = self.on_paste.as_mut() {
            callback(updates);
        }
    }

    pub(crate) fn filled(&mut self, updates: &[CellUpdate]) {
        if let Some(callback) = self.on_cells_filled.as_mut() {
            callback(updates);
        }
    }

    pub(crate) fn cleared(&mut self, updates: &[CellUpdate]) {
        if let Some(callback) = self.on_cells_cleared.as_mut() {
            callback(updates);
        }
    }
}

impl fmt::Debug for EngineCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineCallbacks")
            .field("on_paste", &self.on_paste.is_some())
            .field("on_cells_filled", &self.on_cells_filled.is_some())
            .field("on_cells_cleared", &self.on_cells_cleared.is_some())
            .finish()
    }
}
