//! Context system for conditional keybindings
//!
//! Enables bindings that only activate under certain grid states,
//! such as "Enter edits the focused cell when editing is enabled".

use serde::Deserialize;

/// Grid state extracted from the adapter for keybinding evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyContext {
    /// Whether a cell is in edit mode
    pub editing: bool,
    /// Whether at least one row is selected
    pub has_selection: bool,
    /// Whether a cell has keyboard focus
    pub has_focus: bool,
    /// Whether the engine allows writes
    pub editing_enabled: bool,
}

impl KeyContext {
    /// Idle grid with a focused cell and writes allowed
    pub fn idle() -> Self {
        Self {
            editing: false,
            has_selection: false,
            has_focus: true,
            editing_enabled: true,
        }
    }

    /// Grid with a cell in edit mode
    pub fn editing() -> Self {
        Self {
            editing: true,
            has_selection: false,
            has_focus: true,
            editing_enabled: true,
        }
    }
}

/// Conditions that can be attached to keybindings
///
/// Multiple conditions on a binding are ANDed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Editing,
    Idle,
    HasSelection,
    NoSelection,
    HasFocus,
    EditingEnabled,
}

impl Condition {
    pub fn evaluate(self, ctx: &KeyContext) -> bool {
        match self {
            Condition::Editing => ctx.editing,
            Condition::Idle => !ctx.editing,
            Condition::HasSelection => ctx.has_selection,
            Condition::NoSelection => !ctx.has_selection,
            Condition::HasFocus => ctx.has_focus,
            Condition::EditingEnabled => ctx.editing_enabled,
        }
    }

    /// Evaluate all conditions (AND logic)
    pub fn evaluate_all(conditions: &[Condition], ctx: &KeyContext) -> bool {
        conditions.iter().all(|c| c.evaluate(ctx))
    }
}
