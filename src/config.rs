//! Engine configuration persistence
//!
//! Stores preferences in `~/.config/cellgrid/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Interaction engine options that persist across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Allow paste, fill, clear, edit and undo/redo
    #[serde(default = "default_enable_editing")]
    pub enable_editing: bool,

    /// Copy row ranges through column formatters instead of raw values
    #[serde(default)]
    pub copy_formatted_values: bool,
}

fn default_enable_editing() -> bool {
    true
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enable_editing: default_enable_editing(),
            copy_formatted_values: false,
        }
    }
}

impl GridConfig {
    /// Read-only configuration: every write shortcut is a no-op
    pub fn read_only() -> Self {
        Self {
            enable_editing: false,
            ..Self::default()
        }
    }

    /// Load config from the user config dir, or return defaults if not found
    pub fn load() -> Self {
        match crate::config_paths::config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from a file, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the user config dir
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
