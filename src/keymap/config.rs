//! Keymap files and key strings
//!
//! A keymap file is a YAML list of `key`/`command`/`when` entries. Key
//! strings use the form `Keystroke` prints (`ctrl+shift+z`); the replay
//! tool takes a comma-separated run of them.

use std::path::Path;

use serde::Deserialize;

use super::binding::Keybinding;
use super::command::Command;
use super::context::Condition;
use super::types::{KeyCode, Keystroke, Modifiers};

#[derive(Debug, Deserialize)]
struct KeymapFile {
    bindings: Vec<BindingEntry>,
}

#[derive(Debug, Deserialize)]
struct BindingEntry {
    key: String,
    command: Command,
    #[serde(default)]
    when: Vec<Condition>,
}

impl BindingEntry {
    fn into_binding(self) -> Result<Keybinding, KeymapError> {
        let binding = Keybinding::new(parse_key_string(&self.key)?, self.command);
        if self.when.is_empty() {
            Ok(binding)
        } else {
            Ok(binding.when(self.when))
        }
    }
}

/// Load keybindings from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<Vec<Keybinding>, KeymapError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| KeymapError::IoError(e.to_string()))?;

    parse_keymap_yaml(&content)
}

/// Parse keybindings from YAML string
pub fn parse_keymap_yaml(yaml: &str) -> Result<Vec<Keybinding>, KeymapError> {
    let file: KeymapFile =
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))?;

    file.bindings
        .into_iter()
        .map(BindingEntry::into_binding)
        .collect()
}

/// Parse one key string; the last `+` part is the key, the rest are modifiers
pub fn parse_key_string(text: &str) -> Result<Keystroke, KeymapError> {
    let invalid = || KeymapError::InvalidKey(text.to_string());
    let lowered = text.trim().to_lowercase();
    let mut parts = lowered.split('+').map(str::trim);

    let key = parts
        .next_back()
        .and_then(KeyCode::from_name)
        .ok_or_else(invalid)?;
    let mods = parts
        .try_fold(Modifiers::NONE, |mods, name| {
            Modifiers::from_name(name).map(|m| mods | m)
        })
        .ok_or_else(invalid)?;

    Ok(Keystroke::new(key, mods))
}

/// Parse a comma-separated key sequence like "ctrl+a, ctrl+c"
pub fn parse_key_sequence(keys: &str) -> Result<Vec<Keystroke>, KeymapError> {
    keys.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_key_string)
        .collect()
}

/// Errors that can occur when loading keymaps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    IoError(String),
    /// Malformed YAML, or an unknown command or condition name
    ParseError(String),
    InvalidKey(String),
}

impl std::fmt::Display for KeymapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeymapError::IoError(e) => write!(f, "IO error: {}", e),
            KeymapError::ParseError(e) => write!(f, "Parse error: {}", e),
            KeymapError::InvalidKey(k) => write!(f, "Invalid key: {}", k),
        }
    }
}

impl std::error::Error for KeymapError {}
