//! Configurable keyboard mapping system
//!
//! This module provides a data-driven keybinding system that:
//! - Maps keystrokes to grid commands
//! - Accepts both Ctrl and Cmd (Meta) for every default shortcut
//! - Enables user customization via YAML config files
//! - Supports bindings conditioned on grid state (editing, focus, selection)
//!
//! # Architecture
//!
//! ```text
//! host key event → Keystroke → Keymap::lookup_with_context() → Command → ExcelEngine
//! ```
//!
//! # Loading Keymaps
//!
//! ```ignore
//! // Embedded defaults only
//! let keymap = Keymap::with_bindings(embedded_bindings());
//!
//! // Defaults merged with ~/.config/cellgrid/keymap.yaml
//! let keymap = Keymap::with_bindings(load_default_keymap(None));
//! ```

mod binding;
mod command;
mod config;
mod context;
mod defaults;
#[allow(clippy::module_inception)]
mod keymap;
mod types;

pub use binding::Keybinding;
pub use command::Command;
pub use config::{
    load_keymap_file, parse_key_sequence, parse_key_string, parse_keymap_yaml, KeymapError,
};
pub use context::{Condition, KeyContext};
pub use defaults::{
    default_bindings, embedded_bindings, get_default_keymap_yaml, load_default_keymap,
    merge_bindings,
};
pub use keymap::Keymap;
pub use types::{KeyCode, Keystroke, Modifiers};
