//! Keyboard dispatch tests
//!
//! Escape semantics, suppression while editing, container scoping and
//! starting edits from the keyboard.

mod common;

use cellgrid::engine::{ContainerId, EngineState, ExcelEngine, KeyEvent};
use cellgrid::grid::{CellValue, GridAdapter};
use cellgrid::keymap::{
    default_bindings, merge_bindings, parse_keymap_yaml, KeyCode, Keymap, Keystroke, Modifiers,
};
use cellgrid::{Command, GridConfig, KeyOutcome};
use common::{cell, Call, Harness, RecordingGrid, TestEngine, CONTAINER};

// ========================================================================
// Escape
// ========================================================================

#[test]
fn test_escape_while_idle_deselects() {
    let mut h = Harness::new();
    h.select(&["1", "2"]);
    h.grid_mut().clear_log();

    assert_eq!(
        h.press(Keystroke::key(KeyCode::Escape)),
        KeyOutcome::Handled(Command::Escape)
    );

    assert!(h.grid().called(&Call::DeselectAll));
    assert_eq!(h.grid().stop_editing_calls(), 0);
    assert!(h.grid().get_selected_row_ids().is_empty());
}

#[test]
fn test_escape_while_editing_cancels_without_deselect() {
    let mut h = Harness::new();
    h.select(&["1"]);
    h.focus("1", "name");
    assert!(h.engine.start_editing_focused());
    h.grid_mut().inner.set_edit_buffer("typed but cancelled");
    h.grid_mut().clear_log();

    assert_eq!(
        h.press(Keystroke::key(KeyCode::Escape)),
        KeyOutcome::Handled(Command::Escape)
    );

    assert_eq!(h.grid().calls, vec![Call::StopEditing(true)]);
    assert!(!h.grid().called(&Call::DeselectAll));
    assert_eq!(h.grid().get_selected_row_ids(), vec!["1"]);
    assert_eq!(h.value("1", "name"), CellValue::text("Row 1"));
    assert_eq!(h.engine.state(), EngineState::Idle);
}

#[test]
fn test_second_escape_after_cancel_deselects() {
    let mut h = Harness::new();
    h.select(&["2"]);
    h.focus("2", "value");
    h.engine.start_editing_focused();

    h.press(Keystroke::key(KeyCode::Escape));
    assert_eq!(h.grid().get_selected_row_ids(), vec!["2"]);

    h.press(Keystroke::key(KeyCode::Escape));
    assert!(h.grid().get_selected_row_ids().is_empty());
}

// ========================================================================
// Suppression while editing
// ========================================================================

#[test]
fn test_shortcuts_suppressed_while_editing() {
    let mut h = Harness::new();
    h.select(&["1", "2"]);
    h.focus("1", "name");
    h.engine.start_editing_focused();
    h.clipboard.set_contents("before");
    h.grid_mut().clear_log();

    for keystroke in [
        Keystroke::ctrl('c'),
        Keystroke::ctrl('v'),
        Keystroke::ctrl('a'),
        Keystroke::ctrl('d'),
        Keystroke::meta('z'),
        Keystroke::key(KeyCode::Delete),
        Keystroke::key(KeyCode::Backspace),
        Keystroke::key(KeyCode::Enter),
    ] {
        assert_eq!(h.press(keystroke), KeyOutcome::Suppressed, "{}", keystroke);
    }

    assert!(h.grid().calls.is_empty());
    assert_eq!(h.clipboard.contents().as_deref(), Some("before"));
    assert_eq!(h.log.paste_count(), 0);
    assert_eq!(h.engine.state(), EngineState::Editing);
}

#[test]
fn test_plain_typing_while_editing_is_left_to_host() {
    let mut h = Harness::new();
    h.focus("1", "name");
    h.engine.start_editing_focused();
    h.grid_mut().clear_log();

    assert_eq!(h.press(Keystroke::char('x')), KeyOutcome::Ignored);
    assert!(h.grid().calls.is_empty());
}

// ========================================================================
// Container scoping
// ========================================================================

#[test]
fn test_events_for_other_containers_are_ignored() {
    let mut h = Harness::new();
    h.select(&["1"]);
    h.grid_mut().clear_log();

    let other = KeyEvent::new(ContainerId(99), Keystroke::key(KeyCode::Escape));
    assert_eq!(h.engine.handle_key(&other), KeyOutcome::Ignored);

    let other_copy = KeyEvent::new(ContainerId(99), Keystroke::ctrl('c'));
    assert_eq!(h.engine.handle_key(&other_copy), KeyOutcome::Ignored);

    assert!(h.grid().calls.is_empty());
    assert_eq!(h.clipboard.contents(), None);
}

#[test]
fn test_two_engines_do_not_cross_trigger() {
    let mut left: TestEngine = ExcelEngine::with_adapter(ContainerId(1), RecordingGrid::sample());
    let mut right: TestEngine = ExcelEngine::with_adapter(ContainerId(2), RecordingGrid::sample());
    let select_all = KeyEvent::new(ContainerId(1), Keystroke::ctrl('a'));

    assert!(left.handle_key(&select_all).is_handled());
    assert!(!right.handle_key(&select_all).is_handled());

    assert_eq!(left.adapter().unwrap().get_selected_row_ids().len(), 3);
    assert!(right.adapter().unwrap().get_selected_row_ids().is_empty());
}

#[test]
fn test_no_adapter_ignores_keys() {
    let mut engine: TestEngine = ExcelEngine::new(CONTAINER);
    let event = KeyEvent::new(CONTAINER, Keystroke::ctrl('a'));

    assert_eq!(engine.handle_key(&event), KeyOutcome::Ignored);
    assert_eq!(engine.state(), EngineState::Idle);
}

// ========================================================================
// Dispatch
// ========================================================================

#[test]
fn test_select_all_with_ctrl_and_meta() {
    for keystroke in [Keystroke::ctrl('a'), Keystroke::meta('a')] {
        let mut h = Harness::new();
        assert_eq!(h.press(keystroke), KeyOutcome::Handled(Command::SelectAll));
        assert_eq!(h.grid().get_selected_row_ids(), vec!["1", "2", "3"]);
    }
}

#[test]
fn test_select_all_skips_filtered_rows() {
    let mut h = Harness::new();
    h.grid_mut()
        .inner
        .set_filter(|row| row.get("id") != Some(&CellValue::text("2")));

    h.press(Keystroke::ctrl('a'));

    assert_eq!(h.grid().get_selected_row_ids(), vec!["1", "3"]);
}

#[test]
fn test_unbound_keys_are_ignored() {
    let mut h = Harness::new();
    h.grid_mut().clear_log();

    assert_eq!(h.press(Keystroke::ctrl('q')), KeyOutcome::Ignored);
    assert_eq!(h.press(Keystroke::key(KeyCode::Tab)), KeyOutcome::Ignored);
    assert!(h.grid().calls.is_empty());
}

#[test]
fn test_unbinding_a_default_shortcut() {
    let overrides = parse_keymap_yaml("bindings:\n  - key: ctrl+c\n    command: Unbound\n").unwrap();
    let keymap = Keymap::with_bindings(merge_bindings(default_bindings(), overrides));
    let mut h = Harness::new();
    h.engine = ExcelEngine::with_adapter(CONTAINER, RecordingGrid::sample())
        .with_keymap(keymap)
        .with_clipboard(h.clipboard.clone());
    h.select(&["1"]);

    assert_eq!(h.press(Keystroke::ctrl('c')), KeyOutcome::Ignored);
    assert_eq!(h.clipboard.contents(), None);
    assert_eq!(h.press(Keystroke::meta('c')), KeyOutcome::Handled(Command::Copy));
}

#[test]
fn test_execute_runs_commands_directly() {
    let mut h = Harness::new();
    h.engine.execute(Command::SelectAll);
    assert_eq!(h.grid().get_selected_row_ids().len(), 3);

    h.engine.execute(Command::Escape);
    assert!(h.grid().get_selected_row_ids().is_empty());

    h.engine.execute(Command::Unbound);
}

#[test]
fn test_read_only_engine_runs_only_non_mutating_commands() {
    let mut h = Harness::read_only();
    h.select(&["1", "2"]);
    h.focus("1", "name");
    h.clipboard.set_contents("Pasted");
    h.grid_mut().clear_log();

    for command in [
        Command::Paste,
        Command::FillDown,
        Command::ClearCells,
        Command::StartEditing,
        Command::Undo,
        Command::Redo,
    ] {
        assert!(command.is_mutating());
        h.engine.execute(command);
    }

    assert!(h.grid().calls.is_empty(), "{:?}", h.grid().calls);
    assert_eq!(h.log.paste_count(), 0);
    assert_eq!(h.log.fill_count(), 0);
    assert_eq!(h.log.clear_count(), 0);
    assert_eq!(h.engine.state(), EngineState::Idle);

    h.engine.execute(Command::Copy);
    assert_eq!(h.clipboard.contents().as_deref(), Some("1\tRow 1\t100\n2\tRow 2\t200"));
    h.engine.execute(Command::SelectAll);
    assert_eq!(h.grid().get_selected_row_ids().len(), 3);
}

// ========================================================================
// Starting edits from the keyboard
// ========================================================================

#[test]
fn test_f2_starts_editing_focused_cell() {
    let mut h = Harness::new();
    h.focus("2", "name");

    assert_eq!(
        h.press(Keystroke::key(KeyCode::F(2))),
        KeyOutcome::Handled(Command::StartEditing)
    );
    assert_eq!(h.engine.state(), EngineState::Editing);
    assert_eq!(
        h.grid().get_editing_cell().map(|info| info.cell_id),
        Some(cell("2", "name"))
    );
    assert_eq!(h.grid().inner.edit_buffer(), Some("Row 2"));
}

#[test]
fn test_enter_without_focus_is_ignored() {
    let mut h = Harness::new();
    assert_eq!(h.press(Keystroke::key(KeyCode::Enter)), KeyOutcome::Ignored);
    assert_eq!(h.engine.state(), EngineState::Idle);
}

#[test]
fn test_read_only_cell_does_not_enter_edit_mode() {
    let mut h = Harness::new();
    h.focus("1", "id");

    h.press(Keystroke::key(KeyCode::Enter));
    assert_eq!(h.engine.state(), EngineState::Idle);
    assert!(!h.engine.start_editing_focused());
}

#[test]
fn test_typing_starts_edit_with_typed_character() {
    let mut h = Harness::new();
    h.focus("3", "value");

    assert_eq!(
        h.press(Keystroke::char('7')),
        KeyOutcome::Handled(Command::StartEditing)
    );
    assert!(h.grid().called(&Call::StartEditing(cell("3", "value"), Some('7'))));
    assert_eq!(h.grid().inner.edit_buffer(), Some("7"));

    // Committing parses the buffer
    h.grid_mut().stop_editing(false);
    assert_eq!(h.value("3", "value"), CellValue::Number(7.0));
}

#[test]
fn test_shifted_typing_uses_uppercase() {
    let mut h = Harness::new();
    h.focus("1", "name");

    let shifted = Keystroke::new(KeyCode::Char('q'), Modifiers::SHIFT);
    assert!(h.press(shifted).is_handled());
    assert_eq!(h.grid().inner.edit_buffer(), Some("Q"));
}

#[test]
fn test_typing_ignored_on_read_only_grid_or_cell() {
    let mut h = Harness::read_only();
    h.focus("1", "name");
    assert_eq!(h.press(Keystroke::char('a')), KeyOutcome::Ignored);
    assert_eq!(h.press(Keystroke::key(KeyCode::F(2))), KeyOutcome::Ignored);

    let mut h = Harness::new();
    h.focus("1", "id");
    assert_eq!(h.press(Keystroke::char('a')), KeyOutcome::Ignored);

    let mut h = Harness::new();
    assert_eq!(h.press(Keystroke::char('a')), KeyOutcome::Ignored);
}

#[test]
fn test_key_context_reflects_grid_state() {
    let mut h = Harness::with_grid(RecordingGrid::sample(), GridConfig::read_only());
    let idle = h.engine.key_context();
    assert!(!idle.editing && !idle.has_selection && !idle.has_focus && !idle.editing_enabled);

    h.select(&["1"]);
    h.focus("1", "name");
    let ctx = h.engine.key_context();
    assert!(ctx.has_selection && ctx.has_focus);
}
