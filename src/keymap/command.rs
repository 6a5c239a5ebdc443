//! Command enum representing all grid actions that can be bound to keys
//!
//! Commands are the bridge between keybindings and the interaction engine.
//! Each command maps to exactly one engine operation.

use serde::Deserialize;

/// All executable grid commands that can be bound to keys
///
/// Keymap files name commands by their variant (`FillDown`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Command {
    // ========================================================================
    // Clipboard
    // ========================================================================
    /// Copy the selected rows (or the focused cell) as TSV
    Copy,
    /// Paste TSV at the focused cell
    Paste,

    // ========================================================================
    // Selection
    // ========================================================================
    /// Select every displayed row
    SelectAll,
    /// Cancel the edit in progress, or deselect everything
    Escape,

    // ========================================================================
    // Cell writes
    // ========================================================================
    /// Copy the first selected row into the other selected rows
    FillDown,
    /// Set selected (or focused) editable cells to null
    #[serde(alias = "Clear")]
    ClearCells,
    /// Enter edit mode on the focused cell
    StartEditing,

    // ========================================================================
    // History
    // ========================================================================
    Undo,
    Redo,

    /// Removes a default binding when used in a user keymap
    Unbound,
}

impl Command {
    /// Commands that write cell values or enter edit mode
    ///
    /// These are no-ops while editing is disabled in the engine config.
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            Command::Paste
                | Command::FillDown
                | Command::ClearCells
                | Command::StartEditing
                | Command::Undo
                | Command::Redo
        )
    }

    /// Commands the engine still runs while a cell is being edited
    pub fn runs_while_editing(self) -> bool {
        matches!(self, Command::Escape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutating_commands() {
        assert!(Command::Paste.is_mutating());
        assert!(Command::FillDown.is_mutating());
        assert!(Command::ClearCells.is_mutating());
        assert!(!Command::Copy.is_mutating());
        assert!(!Command::SelectAll.is_mutating());
        assert!(!Command::Escape.is_mutating());
    }

    #[test]
    fn test_only_escape_runs_while_editing() {
        assert!(Command::Escape.runs_while_editing());
        assert!(!Command::Copy.runs_while_editing());
        assert!(!Command::ClearCells.runs_while_editing());
    }

    #[test]
    fn test_keymap_names() {
        let parsed: Vec<Command> =
            serde_yaml::from_str("[FillDown, Clear, ClearCells, Unbound]").unwrap();
        assert_eq!(
            parsed,
            vec![
                Command::FillDown,
                Command::ClearCells,
                Command::ClearCells,
                Command::Unbound
            ]
        );
        assert!(serde_yaml::from_str::<Command>("SaveFile").is_err());
    }
}
