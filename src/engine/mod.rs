//! Excel-style keyboard and clipboard interaction over a `GridAdapter`
//!
//! The engine owns one adapter and one container scope. Key events are
//! resolved through the keymap into a [`Command`] and dispatched to the
//! operations below; hosts can also call the operations directly.
//!
//! ```text
//! KeyEvent → Keymap::lookup_with_context() → Command → operation → adapter / callbacks
//! ```
//!
//! While the adapter reports an edit in progress only `Escape` runs; every
//! other bound shortcut is suppressed so text input keeps working.

mod callbacks;
mod clipboard_ops;
mod edit_ops;
mod selection;
mod stats;

pub use callbacks::EngineCallbacks;
pub use stats::{compute_selection_info, SelectionInfo, StatsAccumulator};

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::clipboard::{ClipboardProvider, SystemClipboard};
use crate::config::GridConfig;
use crate::grid::{CellId, CellUpdate, GridAdapter, Subscription};
use crate::keymap::{embedded_bindings, Command, KeyContext, Keymap, Keystroke};
use crate::tsv;

/// Identifies the element a grid's key events are scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(pub u64);

/// A keystroke delivered to a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub container: ContainerId,
    pub keystroke: Keystroke,
}

impl KeyEvent {
    pub fn new(container: ContainerId, keystroke: Keystroke) -> Self {
        Self {
            container,
            keystroke,
        }
    }
}

/// What the engine did with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not for this grid, or not bound; the host should process it normally
    Ignored,
    /// A bound shortcut swallowed because a cell is being edited
    Suppressed,
    /// The command ran; the host should prevent default handling
    Handled(Command),
}

impl KeyOutcome {
    pub fn is_handled(self) -> bool {
        matches!(self, KeyOutcome::Handled(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Editing,
}

/// Ticket for a paste whose clipboard read may complete later
///
/// Only the most recent request is honoured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteRequest {
    generation: u64,
    anchor: CellId,
}

impl PasteRequest {
    /// The focused cell when the paste was requested
    pub fn anchor(&self) -> &CellId {
        &self.anchor
    }
}

/// Adapter subscriptions held for as long as the adapter is attached
struct ListenerSet {
    _selection: Subscription,
    _focus: Subscription,
    _values: Subscription,
}

impl ListenerSet {
    fn attach<T, A: GridAdapter<T>>(
        adapter: &A,
        stats_stale: &Rc<Cell<bool>>,
        focus_moved: &Rc<Cell<bool>>,
    ) -> Self {
        let stale = Rc::clone(stats_stale);
        let selection = adapter.on_selection_change(Box::new(move |_| stale.set(true)));

        let moved = Rc::clone(focus_moved);
        let focus = adapter.on_focus_change(Box::new(move |_| moved.set(true)));

        let stale = Rc::clone(stats_stale);
        let values = adapter.on_cell_value_change(Box::new(move |_| stale.set(true)));

        Self {
            _selection: selection,
            _focus: focus,
            _values: values,
        }
    }
}

pub struct ExcelEngine<T, A: GridAdapter<T>> {
    container: ContainerId,
    // Dropped before the adapter so listeners detach first
    listeners: Option<ListenerSet>,
    adapter: Option<A>,
    config: GridConfig,
    callbacks: EngineCallbacks,
    keymap: Keymap,
    clipboard: Box<dyn ClipboardProvider>,
    paste_generation: u64,
    pending_paste: Option<u64>,
    focus_moved: Rc<Cell<bool>>,
    stats_stale: Rc<Cell<bool>>,
    selection_info: SelectionInfo,
    _row: PhantomData<fn() -> T>,
}

impl<T, A: GridAdapter<T>> ExcelEngine<T, A> {
    /// An engine with no adapter; every operation is a no-op until `attach`
    pub fn new(container: ContainerId) -> Self {
        Self {
            container,
            listeners: None,
            adapter: None,
            config: GridConfig::default(),
            callbacks: EngineCallbacks::default(),
            keymap: Keymap::with_bindings(embedded_bindings()),
            clipboard: Box::new(SystemClipboard::new()),
            paste_generation: 0,
            pending_paste: None,
            focus_moved: Rc::new(Cell::new(false)),
            stats_stale: Rc::new(Cell::new(true)),
            selection_info: SelectionInfo::default(),
            _row: PhantomData,
        }
    }

    pub fn with_adapter(container: ContainerId, adapter: A) -> Self {
        let mut engine = Self::new(container);
        engine.attach(adapter);
        engine
    }

    pub fn with_config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_callbacks(mut self, callbacks: EngineCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl ClipboardProvider + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Attach an adapter, replacing (and returning) any previous one
    ///
    /// Subscriptions to the old adapter are released before the new ones are
    /// registered.
    pub fn attach(&mut self, adapter: A) -> Option<A> {
        let previous = self.detach();
        self.listeners = Some(ListenerSet::attach::<T, A>(
            &adapter,
            &self.stats_stale,
            &self.focus_moved,
        ));
        self.adapter = Some(adapter);
        self.stats_stale.set(true);
        tracing::debug!("Adapter attached to container {:?}", self.container);
        previous
    }

    /// Release the adapter and its subscriptions
    pub fn detach(&mut self) -> Option<A> {
        self.listeners = None;
        self.pending_paste = None;
        self.selection_info = SelectionInfo::default();
        self.stats_stale.set(false);
        self.adapter.take()
    }

    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn adapter(&self) -> Option<&A> {
        self.adapter.as_ref()
    }

    pub fn adapter_mut(&mut self) -> Option<&mut A> {
        self.adapter.as_mut()
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GridConfig) {
        self.config = config;
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn state(&self) -> EngineState {
        match &self.adapter {
            Some(adapter) if adapter.is_editing() => EngineState::Editing,
            _ => EngineState::Idle,
        }
    }

    /// Grid state used to evaluate conditional keybindings
    pub fn key_context(&self) -> KeyContext {
        let Some(adapter) = &self.adapter else {
            return KeyContext::default();
        };
        KeyContext {
            editing: adapter.is_editing(),
            has_selection: !adapter.get_selected_row_ids().is_empty(),
            has_focus: adapter.get_focused_cell().is_some(),
            editing_enabled: self.config.enable_editing,
        }
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Handle a key event observed on some container
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        if event.container != self.container || self.adapter.is_none() {
            return KeyOutcome::Ignored;
        }

        let context = self.key_context();
        let command = match self
            .keymap
            .lookup_with_context(&event.keystroke, Some(&context))
        {
            Some(Command::Unbound) => return KeyOutcome::Ignored,
            Some(command) => command,
            None => return self.handle_typing(event.keystroke, &context),
        };

        if context.editing && !command.runs_while_editing() {
            tracing::trace!("{:?} suppressed while editing", command);
            return KeyOutcome::Suppressed;
        }

        tracing::debug!("{} -> {:?}", event.keystroke, command);
        self.execute(command);
        KeyOutcome::Handled(command)
    }

    /// A printable key on an idle, focused, editable cell starts editing with it
    fn handle_typing(&mut self, keystroke: Keystroke, context: &KeyContext) -> KeyOutcome {
        if context.editing || !context.editing_enabled {
            return KeyOutcome::Ignored;
        }
        let Some(ch) = keystroke.typed_char() else {
            return KeyOutcome::Ignored;
        };
        if self.start_editing_with(Some(ch)) {
            KeyOutcome::Handled(Command::StartEditing)
        } else {
            KeyOutcome::Ignored
        }
    }

    /// Run a command regardless of how it was triggered
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Copy => {
                self.copy_to_clipboard();
            }
            Command::Paste => {
                self.paste_from_clipboard();
            }
            Command::SelectAll => self.select_all(),
            Command::Escape => self.escape(),
            Command::FillDown => {
                self.fill_down();
            }
            Command::ClearCells => {
                self.clear_selected_cells();
            }
            Command::StartEditing => {
                self.start_editing_focused();
            }
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
            Command::Unbound => {}
        }
    }

    /// Writing commands are refused while editing is disabled
    fn allows(&self, command: Command) -> bool {
        if command.is_mutating() && !self.config.enable_editing {
            tracing::debug!("{:?} ignored, editing disabled", command);
            return false;
        }
        true
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn select_all(&mut self) {
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.select_all();
        }
    }

    /// Cancel the edit in progress, or clear the selection when idle
    ///
    /// Also drops any paste still waiting for clipboard text.
    pub fn escape(&mut self) {
        self.pending_paste = None;
        let Some(adapter) = self.adapter.as_mut() else {
            return;
        };
        if adapter.is_editing() {
            adapter.stop_editing(true);
        } else {
            adapter.deselect_all();
        }
    }

    // ========================================================================
    // Clipboard
    // ========================================================================

    /// Copy the selection (or focused cell) as TSV
    ///
    /// Returns the text written, or `None` if there was nothing to copy or
    /// the clipboard refused it.
    pub fn copy_to_clipboard(&mut self) -> Option<String> {
        let adapter = self.adapter.as_ref()?;
        let formatted = self.config.copy_formatted_values;
        let text = clipboard_ops::copy_text::<T, A>(adapter, formatted)?;

        match self.clipboard.write_text(&text) {
            Ok(()) => Some(text),
            Err(e) => {
                tracing::debug!("Copy failed: {}", e);
                None
            }
        }
    }

    /// Start a paste: record intent and supersede any earlier request
    ///
    /// `None` when editing is disabled, no adapter is attached or nothing is
    /// focused.
    pub fn begin_paste(&mut self) -> Option<PasteRequest> {
        if !self.allows(Command::Paste) {
            return None;
        }
        let focused = self.adapter.as_ref()?.get_focused_cell()?;

        self.paste_generation += 1;
        self.pending_paste = Some(self.paste_generation);
        self.focus_moved.set(false);

        Some(PasteRequest {
            generation: self.paste_generation,
            anchor: focused.cell_id,
        })
    }

    /// Finish a paste with the clipboard text that was read
    ///
    /// Stale requests are dropped. Targets are resolved from the focused
    /// cell *now*, not when the paste began. The resulting updates go to
    /// `on_paste`; nothing is written to the grid.
    pub fn complete_paste(&mut self, request: &PasteRequest, text: &str) -> Vec<CellUpdate> {
        if self.pending_paste != Some(request.generation) {
            tracing::debug!("Dropping superseded paste request {}", request.generation);
            return Vec::new();
        }
        self.pending_paste = None;

        if !self.allows(Command::Paste) {
            return Vec::new();
        }
        let Some(adapter) = self.adapter.as_ref() else {
            return Vec::new();
        };
        let Some(focused) = adapter.get_focused_cell() else {
            tracing::debug!("Paste dropped, focus lost before clipboard read completed");
            return Vec::new();
        };
        if self.focus_moved.get() && focused.cell_id != request.anchor {
            tracing::debug!(
                "Focus moved from {} to {} during paste, anchoring at current focus",
                request.anchor,
                focused.cell_id
            );
        }

        let rows = tsv::parse_tsv(text);
        if rows.is_empty() {
            return Vec::new();
        }

        let updates = clipboard_ops::paste_updates::<T, A>(adapter, &focused, &rows);
        tracing::debug!("Paste produced {} updates", updates.len());
        self.callbacks.pasted(&updates);
        updates
    }

    /// Whether a paste is waiting for `complete_paste`
    pub fn has_pending_paste(&self) -> bool {
        self.pending_paste.is_some()
    }

    /// Paste from the engine's clipboard provider in one step
    pub fn paste_from_clipboard(&mut self) -> Vec<CellUpdate> {
        let Some(request) = self.begin_paste() else {
            return Vec::new();
        };
        match self.clipboard.read_text() {
            Ok(text) => self.complete_paste(&request, &text),
            Err(e) => {
                tracing::debug!("Paste failed: {}", e);
                self.pending_paste = None;
                Vec::new()
            }
        }
    }

    /// Commit updates (typically from `on_paste`) through the adapter
    ///
    /// Returns the number of cells changed.
    pub fn apply_updates(&mut self, updates: &[CellUpdate]) -> usize {
        match self.adapter.as_mut() {
            Some(adapter) => edit_ops::apply_updates::<T, A>(adapter, updates),
            None => 0,
        }
    }

    // ========================================================================
    // Cell writes
    // ========================================================================

    /// Copy the first selected row into the rest of the selection
    pub fn fill_down(&mut self) -> Vec<CellUpdate> {
        if !self.allows(Command::FillDown) {
            return Vec::new();
        }
        let Some(adapter) = self.adapter.as_mut() else {
            return Vec::new();
        };
        let Some(updates) = edit_ops::fill_down::<T, A>(adapter) else {
            return Vec::new();
        };
        self.callbacks.filled(&updates);
        updates
    }

    /// Null out editable cells of the selected rows, or the focused cell
    pub fn clear_selected_cells(&mut self) -> Vec<CellUpdate> {
        if !self.allows(Command::ClearCells) {
            return Vec::new();
        }
        let Some(adapter) = self.adapter.as_mut() else {
            return Vec::new();
        };
        let Some(updates) = edit_ops::clear_cells::<T, A>(adapter) else {
            return Vec::new();
        };
        self.callbacks.cleared(&updates);
        updates
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Enter edit mode on the focused cell; returns whether editing started
    pub fn start_editing_focused(&mut self) -> bool {
        self.start_editing_with(None)
    }

    fn start_editing_with(&mut self, initial_key: Option<char>) -> bool {
        if !self.allows(Command::StartEditing) {
            return false;
        }
        let Some(adapter) = self.adapter.as_mut() else {
            return false;
        };
        if adapter.is_editing() {
            return false;
        }
        let Some(focused) = adapter.get_focused_cell() else {
            return false;
        };
        if !adapter.is_cell_editable(&focused.cell_id) {
            tracing::debug!("Focused cell {} is read-only", focused.cell_id);
            return false;
        }
        adapter.start_editing(&focused.cell_id, initial_key);
        adapter.is_editing()
    }

    pub fn undo(&mut self) -> bool {
        self.history_step(Command::Undo, |adapter| adapter.undo())
    }

    pub fn redo(&mut self) -> bool {
        self.history_step(Command::Redo, |adapter| adapter.redo())
    }

    fn history_step(&mut self, command: Command, step: impl FnOnce(&mut A) -> bool) -> bool {
        if !self.allows(command) {
            return false;
        }
        match self.adapter.as_mut() {
            Some(adapter) if !adapter.is_editing() => step(adapter),
            _ => false,
        }
    }

    // ========================================================================
    // Selection statistics
    // ========================================================================

    /// Recompute statistics from the current selection
    pub fn update_selection_info(&mut self) -> &SelectionInfo {
        self.selection_info = match &self.adapter {
            Some(adapter) => compute_selection_info::<T, A>(adapter),
            None => SelectionInfo::default(),
        };
        self.stats_stale.set(false);
        &self.selection_info
    }

    /// Statistics for the current selection
    ///
    /// Recomputed only when a selection or value change was observed since
    /// the last computation.
    pub fn selection_info(&mut self) -> &SelectionInfo {
        if self.stats_stale.get() {
            self.update_selection_info();
        }
        &self.selection_info
    }
}

impl<T, A: GridAdapter<T>> fmt::Debug for ExcelEngine<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcelEngine")
            .field("container", &self.container)
            .field("attached", &self.adapter.is_some())
            .field("config", &self.config)
            .field("callbacks", &self.callbacks)
            .field("pending_paste", &self.pending_paste)
            .finish()
    }
}
