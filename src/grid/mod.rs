//! Grid capability layer
//!
//! Everything the interaction engine knows about a table widget goes through
//! [`GridAdapter`]. Rows and columns are addressed by stable IDs; display
//! indices are derived on demand.

mod adapter;
mod column;
mod events;
mod history;
mod memory;
mod types;

pub use adapter::GridAdapter;
pub use column::{ColumnAdapter, Editable, Pinned, ValueFormatter, ValueGetter};
pub use events::{CellValueChange, Listener, Listeners, SelectionChange, Subscription};
pub use history::{CellChange, ChangeHistory, ChangeSet};
pub use memory::{compare_values, MemoryGrid, Record, RowData, SortDirection};
pub use types::{CellId, CellUpdate, CellValue, EditingCellInfo, FocusedCell, RowNode};
