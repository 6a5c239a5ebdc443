//! cellgrid - spreadsheet-style keyboard and clipboard interaction for data grids
//!
//! A grid widget is wrapped by implementing [`GridAdapter`]; the
//! [`ExcelEngine`] then maps keyboard shortcuts onto copy, paste, select all,
//! fill down, clear and escape, and keeps live statistics for the selection.

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod config_paths;
pub mod dataset;
pub mod engine;
pub mod grid;
pub mod keymap;
pub mod tracing;
pub mod tsv;

// Re-export commonly used types
pub use clipboard::{
    ClipboardError, ClipboardProvider, MemoryClipboard, SystemClipboard, UnavailableClipboard,
};
pub use config::GridConfig;
pub use engine::{
    ContainerId, EngineCallbacks, EngineState, ExcelEngine, KeyEvent, KeyOutcome, PasteRequest,
    SelectionInfo,
};
pub use grid::{
    CellId, CellUpdate, CellValue, ColumnAdapter, FocusedCell, GridAdapter, MemoryGrid, Record,
    RowNode,
};
pub use keymap::{Command, KeyCode, Keymap, Keystroke, Modifiers};
