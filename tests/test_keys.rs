//! Tests for key normalization and the key handler back-ends

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use modelmenu::cli::keys::{map_edit_event, map_key_event};
use modelmenu::cli::{EditKey, KeyHandler, LogicalKey, ScriptedEvents, ScriptedKeys, TerminalKeys};

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn test_menu_key_table() {
    let cases = [
        (KeyCode::Up, Some(LogicalKey::Up)),
        (KeyCode::Char('w'), Some(LogicalKey::Up)),
        (KeyCode::Char('W'), Some(LogicalKey::Up)),
        (KeyCode::Down, Some(LogicalKey::Down)),
        (KeyCode::Char('s'), Some(LogicalKey::Down)),
        (KeyCode::Char('S'), Some(LogicalKey::Down)),
        (KeyCode::Enter, Some(LogicalKey::Confirm)),
        (KeyCode::Esc, Some(LogicalKey::Cancel)),
        (KeyCode::Char('q'), Some(LogicalKey::Char('q'))),
        (KeyCode::Tab, None),
        (KeyCode::F(1), None),
    ];

    for (code, expected) in cases {
        assert_eq!(map_key_event(&press(code)), expected, "{:?}", code);
    }
}

#[test]
fn test_ctrl_c_cancels() {
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(map_key_event(&ctrl_c), Some(LogicalKey::Cancel));
    assert_eq!(map_edit_event(&ctrl_c), Some(EditKey::Cancel));

    let ctrl_w = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
    assert_eq!(map_key_event(&ctrl_w), None);
}

#[test]
fn test_releases_are_swallowed() {
    let mut release = press(KeyCode::Enter);
    release.kind = KeyEventKind::Release;
    assert_eq!(map_key_event(&release), None);
    assert_eq!(map_edit_event(&release), None);
}

#[test]
fn test_edit_key_table() {
    assert_eq!(map_edit_event(&press(KeyCode::Char('w'))), Some(EditKey::Insert('w')));
    assert_eq!(map_edit_event(&press(KeyCode::Backspace)), Some(EditKey::Backspace));
    assert_eq!(map_edit_event(&press(KeyCode::Left)), Some(EditKey::Left));
    assert_eq!(map_edit_event(&press(KeyCode::Right)), Some(EditKey::Right));
    assert_eq!(map_edit_event(&press(KeyCode::Home)), Some(EditKey::Home));
    assert_eq!(map_edit_event(&press(KeyCode::End)), Some(EditKey::End));
    assert_eq!(map_edit_event(&press(KeyCode::Enter)), Some(EditKey::Submit));
    assert_eq!(map_edit_event(&press(KeyCode::Esc)), Some(EditKey::Cancel));
    assert_eq!(map_edit_event(&press(KeyCode::Up)), None);
}

#[test]
fn test_terminal_keys_skip_unmapped_events() {
    let events = ScriptedEvents::new([
        Event::FocusGained,
        Event::Key(press(KeyCode::Tab)),
        Event::Key(press(KeyCode::Down)),
        Event::Resize(80, 24),
        Event::Key(press(KeyCode::Enter)),
    ]);
    let mut keys = TerminalKeys::with_source(events);

    assert_eq!(keys.wait().unwrap(), LogicalKey::Down);
    assert_eq!(keys.poll().unwrap(), Some(LogicalKey::Confirm));
    // A finished event script reads as Esc
    assert_eq!(keys.poll().unwrap(), Some(LogicalKey::Cancel));
    assert_eq!(keys.wait().unwrap(), LogicalKey::Cancel);
}

#[test]
fn test_scripted_keys_cancel_when_finished() {
    let mut keys = ScriptedKeys::new([LogicalKey::Up]);
    assert_eq!(keys.wait().unwrap(), LogicalKey::Up);
    assert_eq!(keys.wait().unwrap(), LogicalKey::Cancel);
    assert_eq!(keys.poll().unwrap(), Some(LogicalKey::Cancel));
}

#[test]
fn test_scripted_keys_idle_steps() {
    let mut keys = ScriptedKeys::new([LogicalKey::Down]).idle(2).then([LogicalKey::Confirm]);
    assert_eq!(keys.remaining(), 4);

    assert_eq!(keys.poll().unwrap(), Some(LogicalKey::Down));
    assert_eq!(keys.poll().unwrap(), None);
    assert_eq!(keys.poll().unwrap(), None);
    assert_eq!(keys.poll().unwrap(), Some(LogicalKey::Confirm));

    // Blocking reads skip idle steps
    let mut keys = ScriptedKeys::default().idle(3).then([LogicalKey::Up]);
    assert_eq!(keys.wait().unwrap(), LogicalKey::Up);
    assert_eq!(keys.remaining(), 0);
}

#[test]
fn test_flush_discards_pending_events() {
    let events = ScriptedEvents::new((0..10).map(|_| Event::Key(press(KeyCode::Down))));
    let mut keys = TerminalKeys::with_source(events);
    keys.flush();
    assert_eq!(keys.poll().unwrap(), Some(LogicalKey::Cancel));
}
