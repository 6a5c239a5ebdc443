//! Loading tabular data files into a `MemoryGrid`
//!
//! CSV/TSV files are parsed with the csv crate (first record is the header).
//! JSON files must hold an array of flat objects.

use std::collections::HashSet;
use std::fmt;
use std::io::Cursor;
use std::path::Path;

use crate::grid::{CellValue, ColumnAdapter, MemoryGrid, Record, RowData};

/// Error type for dataset loading
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Csv { message: String, line: Option<usize> },
    Json(serde_json::Error),
    /// The file parsed but has a shape we cannot turn into rows
    Shape(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {}", e),
            LoadError::Csv {
                message,
                line: Some(line),
            } => write!(f, "CSV parse error at line {}: {}", line, message),
            LoadError::Csv {
                message,
                line: None,
            } => write!(f, "CSV parse error: {}", message),
            LoadError::Json(e) => write!(f, "JSON parse error: {}", e),
            LoadError::Shape(msg) => write!(f, "Unsupported data layout: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Json(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
    Semicolon,
    Pipe,
}

impl Delimiter {
    pub fn byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Semicolon => b';',
            Delimiter::Pipe => b'|',
        }
    }

    /// Pick the separator that occurs most in the first few lines
    pub fn detect(content: &str) -> Self {
        let head: Vec<&str> = content.lines().take(5).collect();
        let count = |c: char| head.iter().map(|line| line.matches(c).count()).sum::<usize>();

        [
            (Delimiter::Comma, count(',')),
            (Delimiter::Semicolon, count(';')),
            (Delimiter::Pipe, count('|')),
            (Delimiter::Tab, count('\t')),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        // Ties go to the later entry
        .max_by_key(|(_, n)| *n)
        .map(|(d, _)| d)
        .unwrap_or(Delimiter::Comma)
    }
}

/// Rows and column names read from a file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<(String, Record)>,
    /// Field the row IDs were taken from, if any
    pub id_field: Option<String>,
}

impl Dataset {
    /// Load by extension: `.json` as JSON, anything else as delimited text
    pub fn load(path: &Path, id_field: Option<&str>) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let dataset = if is_json {
            Self::from_json(&content, id_field)?
        } else {
            Self::from_csv(&content, Delimiter::detect(&content), id_field)?
        };
        tracing::info!(
            "Loaded {} rows x {} columns from {}",
            dataset.rows.len(),
            dataset.columns.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse delimited text with a header record
    ///
    /// Fields are read through `CellValue::parse_input`, so numeric text
    /// becomes a number and empty fields become null.
    pub fn from_csv(
        content: &str,
        delimiter: Delimiter,
        id_field: Option<&str>,
    ) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter.byte())
            .has_headers(true)
            .flexible(true)
            .from_reader(Cursor::new(content.as_bytes()));

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| LoadError::Csv {
                message: e.to_string(),
                line: Some(1),
            })?
            .iter()
            .map(str::to_string)
            .collect();
        if columns.is_empty() {
            return Ok(Self::default());
        }

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let row = result.map_err(|e| LoadError::Csv {
                message: e.to_string(),
                line: Some(index + 2),
            })?;
            let record: Record = columns
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = row.get(i).map(CellValue::parse_input).unwrap_or_default();
                    (name.clone(), value)
                })
                .collect();
            records.push(record);
        }

        Self::assemble(columns, records, id_field)
    }

    /// Parse a JSON array of objects; column order follows first appearance
    pub fn from_json(content: &str, id_field: Option<&str>) -> Result<Self, LoadError> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let serde_json::Value::Array(items) = value else {
            return Err(LoadError::Shape("expected a JSON array of objects".into()));
        };

        let mut columns: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            let serde_json::Value::Object(object) = item else {
                return Err(LoadError::Shape(format!("element {} is not an object", index)));
            };
            let mut record = Record::new();
            for (key, value) in object {
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
                record.insert(key, json_to_cell(value));
            }
            records.push(record);
        }

        Self::assemble(columns, records, id_field)
    }

    fn assemble(
        columns: Vec<String>,
        records: Vec<Record>,
        id_field: Option<&str>,
    ) -> Result<Self, LoadError> {
        let id_field = match id_field {
            Some(field) if columns.iter().any(|c| c == field) => Some(field.to_string()),
            Some(field) => {
                return Err(LoadError::Shape(format!("no column named '{}'", field)));
            }
            // Fall back to an "id" column when there is one
            None => columns.iter().find(|c| *c == "id").cloned(),
        };

        let rows = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let id = id_field
                    .as_deref()
                    .map(|field| record.field(field).to_string())
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| (index + 1).to_string());
                (id, record)
            })
            .collect();

        Ok(Self {
            columns,
            rows,
            id_field,
        })
    }

    /// Build an in-memory grid; the ID column (if any) is read-only
    pub fn into_grid(self) -> MemoryGrid<Record> {
        let id_field = self.id_field;
        let columns = self
            .columns
            .into_iter()
            .map(|name| {
                let editable = id_field.as_deref() != Some(name.as_str());
                ColumnAdapter::new(name).editable(editable)
            })
            .collect();
        MemoryGrid::with_rows(columns, self.rows)
    }
}

fn json_to_cell(value: serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Null,
        serde_json::Value::Bool(b) => CellValue::Bool(b),
        serde_json::Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or_default(),
        serde_json::Value::String(s) => CellValue::Text(s),
        // Nested values are kept as their JSON text
        other => CellValue::Text(other.to_string()),
    }
}
