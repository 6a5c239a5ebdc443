//! cellgrid - replay spreadsheet shortcuts against a data file
//!
//! Loads a CSV/TSV/JSON file into an in-memory grid, replays a key sequence
//! through the interaction engine and prints what happened: clipboard text,
//! the cell updates each operation produced, the resulting grid and the
//! selection statistics.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

use cellgrid::cli::{CliArgs, OutputFormat, ReplayConfig};
use cellgrid::dataset::Dataset;
use cellgrid::engine::{ContainerId, EngineCallbacks, ExcelEngine, KeyEvent};
use cellgrid::grid::{CellUpdate, GridAdapter, MemoryGrid, Record};
use cellgrid::keymap::{load_default_keymap, KeyCode, Keymap, Keystroke};
use cellgrid::{tsv, GridConfig, MemoryClipboard, SelectionInfo};

const CONTAINER: ContainerId = ContainerId(1);

type Engine = ExcelEngine<Record, MemoryGrid<Record>>;

/// Updates reported by one engine callback
#[derive(Debug, Serialize)]
struct OperationLog {
    operation: &'static str,
    updates: Vec<CellUpdate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    clipboard: Option<String>,
    operations: Vec<OperationLog>,
    selected_row_ids: Vec<String>,
    selection_info: SelectionInfo,
    grid: String,
}

fn main() -> Result<()> {
    let config = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;

    cellgrid::tracing::init();

    let dataset = Dataset::load(&config.data, config.id_field.as_deref())
        .with_context(|| format!("Failed to load {}", config.data.display()))?;
    let mut grid = dataset.into_grid();

    if !config.select.is_empty() {
        let ids: Vec<&str> = config.select.iter().map(String::as_str).collect();
        grid.select_rows(&ids);
    }
    if let Some(cell) = &config.focus {
        grid.set_focused_cell(cell);
        if grid.get_focused_cell().is_none() {
            tracing::warn!("Cannot focus {}, no such displayed cell", cell);
        }
    }

    let clipboard = MemoryClipboard::new();
    if let Some(text) = &config.clipboard {
        clipboard.set_contents(text.as_str());
    }

    let log = Rc::new(RefCell::new(Vec::new()));
    let pending_paste = Rc::new(RefCell::new(Vec::new()));
    let mut engine = build_engine(&config, grid, clipboard.clone(), &log, &pending_paste);

    for keystroke in &config.keys {
        replay_key(&mut engine, *keystroke, &pending_paste);
    }

    let report = Report {
        clipboard: clipboard.contents(),
        operations: log.take(),
        selected_row_ids: engine
            .adapter()
            .map(|grid| grid.get_selected_row_ids())
            .unwrap_or_default(),
        selection_info: engine.selection_info().clone(),
        grid: engine.adapter().map(grid_as_tsv).unwrap_or_default(),
    };

    match config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

fn build_engine(
    config: &ReplayConfig,
    grid: MemoryGrid<Record>,
    clipboard: MemoryClipboard,
    log: &Rc<RefCell<Vec<OperationLog>>>,
    pending_paste: &Rc<RefCell<Vec<CellUpdate>>>,
) -> Engine {
    let paste_log = Rc::clone(log);
    let paste_queue = Rc::clone(pending_paste);
    let fill_log = Rc::clone(log);
    let clear_log = Rc::clone(log);

    let callbacks = EngineCallbacks::new()
        .on_paste(move |updates| {
            paste_log.borrow_mut().push(OperationLog {
                operation: "paste",
                updates: updates.to_vec(),
            });
            paste_queue.borrow_mut().extend_from_slice(updates);
        })
        .on_cells_filled(move |updates| {
            fill_log.borrow_mut().push(OperationLog {
                operation: "fill_down",
                updates: updates.to_vec(),
            });
        })
        .on_cells_cleared(move |updates| {
            clear_log.borrow_mut().push(OperationLog {
                operation: "clear",
                updates: updates.to_vec(),
            });
        });

    let grid_config = config.grid.clone().unwrap_or_else(GridConfig::load);
    let keymap = Keymap::with_bindings(load_default_keymap(config.keymap.as_deref()));

    ExcelEngine::with_adapter(CONTAINER, grid)
        .with_config(grid_config)
        .with_keymap(keymap)
        .with_clipboard(clipboard)
        .with_callbacks(callbacks)
}

/// Deliver one keystroke the way a host widget would
///
/// Keys the engine leaves alone while a cell is being edited go to the
/// cell's text buffer. Accepted paste updates are committed right away.
fn replay_key(engine: &mut Engine, keystroke: Keystroke, pending_paste: &RefCell<Vec<CellUpdate>>) {
    let outcome = engine.handle_key(&KeyEvent::new(CONTAINER, keystroke));
    tracing::debug!("{} -> {:?}", keystroke, outcome);

    let updates = pending_paste.take();
    if !updates.is_empty() {
        let applied = engine.apply_updates(&updates);
        tracing::info!("Committed {} of {} pasted cells", applied, updates.len());
    }

    if outcome.is_handled() {
        return;
    }
    let Some(grid) = engine.adapter_mut() else {
        return;
    };
    if !grid.is_editing() {
        return;
    }

    if let Some(c) = keystroke.typed_char() {
        let mut buffer = grid.edit_buffer().unwrap_or_default().to_string();
        buffer.push(c);
        grid.set_edit_buffer(&buffer);
        return;
    }
    match keystroke.key {
        KeyCode::Backspace => {
            let mut buffer = grid.edit_buffer().unwrap_or_default().to_string();
            buffer.pop();
            grid.set_edit_buffer(&buffer);
        }
        KeyCode::Enter | KeyCode::Tab => grid.stop_editing(false),
        _ => {}
    }
}

/// Header plus displayed rows over the visible columns
fn grid_as_tsv(grid: &MemoryGrid<Record>) -> String {
    let columns = grid.get_visible_columns();
    let header = columns.iter().map(|c| c.id.clone()).collect::<Vec<_>>();
    let rows = grid.displayed_row_ids().into_iter().map(|row_id| {
        columns
            .iter()
            .map(|column| {
                grid.get_cell_value(&cellgrid::CellId::new(row_id.as_str(), column.id.as_str()))
                    .to_string()
            })
            .collect::<Vec<_>>()
    });
    tsv::serialize_rows(std::iter::once(header).chain(rows))
}

fn print_report(report: &Report) {
    if let Some(text) = &report.clipboard {
        println!("Clipboard:");
        for line in text.lines() {
            println!("  {}", line.replace('\t', " | "));
        }
        println!();
    }

    for op in &report.operations {
        println!("{} ({} cells)", op.operation, op.updates.len());
        for update in &op.updates {
            println!(
                "  {}.{}: {:?} -> {:?}",
                update.row_id,
                update.field,
                update.old_value.to_string(),
                update.new_value.to_string()
            );
        }
    }
    if !report.operations.is_empty() {
        println!();
    }

    println!("Grid:");
    for line in report.grid.lines() {
        println!("  {}", line.replace('\t', " | "));
    }
    println!();

    if report.selected_row_ids.is_empty() {
        println!("No rows selected");
    } else {
        println!("Selected: {}", report.selected_row_ids.join(", "));
        println!("{}", report.selection_info);
    }
}
