//! Command-line argument parsing for the replay tool
//!
//! Supports:
//! - Loading a CSV/TSV/JSON data file into an in-memory grid
//! - Initial focus and selection
//! - Seeding the clipboard
//! - Replaying a comma-separated key sequence through the engine

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::GridConfig;
use crate::grid::CellId;
use crate::keymap::{parse_key_sequence, Keystroke};

/// Replay spreadsheet shortcuts against a data file
#[derive(Parser, Debug)]
#[command(name = "cellgrid", version, about = "Replay spreadsheet shortcuts against a data file")]
pub struct CliArgs {
    /// CSV, TSV or JSON file to load
    #[arg(value_name = "FILE")]
    pub data: PathBuf,

    /// Keys to replay, e.g. "ctrl+a, ctrl+c"
    #[arg(short, long, value_name = "KEYS", default_value = "")]
    pub keys: String,

    /// Focus a cell before replaying, as ROW_ID:COLUMN
    #[arg(short, long, value_name = "ROW:COL")]
    pub focus: Option<String>,

    /// Select rows before replaying (comma-separated row IDs)
    #[arg(short, long, value_name = "IDS")]
    pub select: Option<String>,

    /// Initial clipboard text (escape sequences \t and \n are expanded)
    #[arg(long, value_name = "TEXT")]
    pub clipboard: Option<String>,

    /// Extra keymap file merged over the defaults
    #[arg(long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Column holding row IDs (defaults to "id" when present)
    #[arg(long, value_name = "FIELD")]
    pub id_field: Option<String>,

    /// Disable every write shortcut
    #[arg(long)]
    pub no_edit: bool,

    /// Copy formatted values instead of raw values
    #[arg(long)]
    pub formatted: bool,

    /// Output format for the final report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub data: PathBuf,
    pub id_field: Option<String>,
    pub keys: Vec<Keystroke>,
    pub focus: Option<CellId>,
    pub select: Vec<String>,
    pub clipboard: Option<String>,
    pub keymap: Option<PathBuf>,
    /// `None` means use the persisted config
    pub grid: Option<GridConfig>,
    pub output: OutputFormat,
}

impl CliArgs {
    /// Convert parsed CLI args into a replay configuration
    pub fn into_config(self) -> Result<ReplayConfig, String> {
        let keys = parse_key_sequence(&self.keys).map_err(|e| e.to_string())?;

        let focus = match self.focus.as_deref() {
            Some(text) => Some(parse_cell(text)?),
            None => None,
        };

        let select = self
            .select
            .as_deref()
            .map(|ids| {
                ids.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let grid = (self.no_edit || self.formatted).then(|| {
            let mut config = GridConfig::load();
            if self.no_edit {
                config.enable_editing = false;
            }
            if self.formatted {
                config.copy_formatted_values = true;
            }
            config
        });

        Ok(ReplayConfig {
            data: self.data,
            id_field: self.id_field,
            keys,
            focus,
            select,
            clipboard: self.clipboard.as_deref().map(unescape),
            keymap: self.keymap,
            grid,
            output: self.output,
        })
    }
}

fn parse_cell(text: &str) -> Result<CellId, String> {
    let (row, column) = text
        .rsplit_once(':')
        .ok_or_else(|| format!("Invalid cell '{}', expected ROW_ID:COLUMN", text))?;
    if row.is_empty() || column.is_empty() {
        return Err(format!("Invalid cell '{}', expected ROW_ID:COLUMN", text));
    }
    Ok(CellId::new(row, column))
}

/// Expand `\t`, `\n` and `\\` so TSV can be passed on a command line
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
