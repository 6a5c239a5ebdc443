//! Default keybindings for the grid
//!
//! The defaults ship as keymap.yaml embedded at compile time, with a
//! hardcoded copy as fallback.

use std::path::Path;

use super::binding::Keybinding;
use super::command::Command;
use super::config::{load_keymap_file, parse_keymap_yaml};
use super::context::Condition;
use super::types::{KeyCode, Keystroke, Modifiers};
use crate::config_paths;

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

pub fn get_default_keymap_yaml() -> &'static str {
    DEFAULT_KEYMAP_YAML
}

/// Bindings from the embedded keymap, or the hardcoded defaults if it fails to parse
pub fn embedded_bindings() -> Vec<Keybinding> {
    match parse_keymap_yaml(DEFAULT_KEYMAP_YAML) {
        Ok(bindings) => bindings,
        Err(e) => {
            tracing::warn!(
                "Failed to parse embedded keymap: {}, using hardcoded defaults",
                e
            );
            default_bindings()
        }
    }
}

/// Load and merge keymaps: defaults + user overrides
///
/// Loading order (each layer overrides the previous):
/// 1. Embedded default keymap (compiled into binary)
/// 2. User config at ~/.config/cellgrid/keymap.yaml
/// 3. An explicit file, if given
///
/// Bindings with `command: Unbound` remove matching earlier bindings.
pub fn load_default_keymap(extra: Option<&Path>) -> Vec<Keybinding> {
    let mut bindings = embedded_bindings();
    tracing::info!("Loaded embedded default keymap ({} bindings)", bindings.len());

    if let Some(user_path) = config_paths::keymap_file() {
        if user_path.exists() {
            match load_keymap_file(&user_path) {
                Ok(user_bindings) => {
                    tracing::info!(
                        "Merging user keymap from {} ({} bindings)",
                        user_path.display(),
                        user_bindings.len()
                    );
                    bindings = merge_bindings(bindings, user_bindings);
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load user keymap from {}: {}",
                        user_path.display(),
                        e
                    );
                }
            }
        }
    }

    if let Some(path) = extra {
        match load_keymap_file(path) {
            Ok(extra_bindings) => {
                tracing::info!(
                    "Merging keymap from {} ({} bindings)",
                    path.display(),
                    extra_bindings.len()
                );
                bindings = merge_bindings(bindings, extra_bindings);
            }
            Err(e) => tracing::warn!("Failed to load keymap from {}: {}", path.display(), e),
        }
    }

    bindings
}

/// Merge override bindings into base bindings
///
/// - Same keystroke + same conditions → replaces the base binding
/// - Command `Unbound` → removes every base binding for that keystroke
/// - Otherwise → the binding is added
pub fn merge_bindings(base: Vec<Keybinding>, overrides: Vec<Keybinding>) -> Vec<Keybinding> {
    let mut result = base;

    for binding in overrides {
        if binding.command == Command::Unbound {
            result.retain(|b| b.keystroke != binding.keystroke);
            continue;
        }

        let existing_idx = result
            .iter()
            .position(|b| b.keystroke == binding.keystroke && b.when == binding.when);

        match existing_idx {
            Some(idx) => result[idx] = binding,
            None => result.push(binding),
        }
    }

    result
}

/// Hardcoded default keybindings
///
/// Mirrors keymap.yaml: Ctrl and Meta are both bound for every shortcut.
pub fn default_bindings() -> Vec<Keybinding> {
    let none = Modifiers::NONE;
    let shift = Modifiers::SHIFT;

    let mut bindings = Vec::new();
    for primary in [Modifiers::CTRL, Modifiers::META] {
        bindings.extend([
            bind(KeyCode::Char('c'), primary, Command::Copy),
            bind(KeyCode::Char('v'), primary, Command::Paste),
            bind(KeyCode::Char('a'), primary, Command::SelectAll),
            bind(KeyCode::Char('d'), primary, Command::FillDown),
            bind(KeyCode::Char('z'), primary, Command::Undo),
            bind(KeyCode::Char('y'), primary, Command::Redo),
            bind(KeyCode::Char('z'), primary | shift, Command::Redo),
        ]);
    }

    let start_editing = vec![Condition::HasFocus, Condition::EditingEnabled];
    bindings.extend([
        bind(KeyCode::Escape, none, Command::Escape),
        bind(KeyCode::Delete, none, Command::ClearCells),
        bind(KeyCode::Backspace, none, Command::ClearCells),
        bind(KeyCode::F(2), none, Command::StartEditing).when(start_editing.clone()),
        bind(KeyCode::Enter, none, Command::StartEditing).when(start_editing),
    ]);

    bindings
}

fn bind(key: KeyCode, mods: Modifiers, command: Command) -> Keybinding {
    Keybinding::new(Keystroke::new(key, mods), command)
}
