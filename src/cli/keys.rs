//! Key normalization: raw terminal events to logical menu and edit keys

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::utils::RawModeGuard;

/// Closed vocabulary the menu state machine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKey {
    Up,
    Down,
    Confirm,
    Cancel,
    /// Any other printable character; ignored by the menu
    Char(char),
}

/// Keys understood by text entry widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Insert(char),
    Backspace,
    Left,
    Right,
    Home,
    End,
    Submit,
    Cancel,
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

/// Map a key event to a logical key. Releases and unmapped keys yield `None`.
pub fn map_key_event(key: &KeyEvent) -> Option<LogicalKey> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_interrupt(key) {
        return Some(LogicalKey::Cancel);
    }
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(LogicalKey::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(LogicalKey::Down),
        KeyCode::Enter => Some(LogicalKey::Confirm),
        KeyCode::Esc => Some(LogicalKey::Cancel),
        KeyCode::Char(c) if !c.is_control() => Some(LogicalKey::Char(c)),
        _ => None,
    }
}

/// Map a key event for text entry. Every printable character is inserted,
/// including the menu's `w`/`s` navigation keys.
pub fn map_edit_event(key: &KeyEvent) -> Option<EditKey> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_interrupt(key) {
        return Some(EditKey::Cancel);
    }
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }

    match key.code {
        KeyCode::Char(c) if !c.is_control() => Some(EditKey::Insert(c)),
        KeyCode::Backspace => Some(EditKey::Backspace),
        KeyCode::Left => Some(EditKey::Left),
        KeyCode::Right => Some(EditKey::Right),
        KeyCode::Home => Some(EditKey::Home),
        KeyCode::End => Some(EditKey::End),
        KeyCode::Enter => Some(EditKey::Submit),
        KeyCode::Esc => Some(EditKey::Cancel),
        _ => None,
    }
}

/// Source of raw terminal events
pub trait EventSource {
    /// Next pending event, without blocking
    fn poll_event(&mut self) -> Result<Option<Event>>;

    /// Block until an event arrives
    fn read_event(&mut self) -> Result<Event>;
}

/// Events read from the real terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll_event(&mut self) -> Result<Option<Event>> {
        if event::poll(Duration::ZERO)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    fn read_event(&mut self) -> Result<Event> {
        Ok(event::read()?)
    }
}

/// Pre-recorded events, used by tests and scripted runs. Once the script
/// runs out every read yields Esc, so open screens and the menu close.
#[derive(Debug, Default, Clone)]
pub struct ScriptedEvents {
    queue: VecDeque<Event>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl EventSource for ScriptedEvents {
    fn poll_event(&mut self) -> Result<Option<Event>> {
        Ok(Some(self.read_event()?))
    }

    fn read_event(&mut self) -> Result<Event> {
        Ok(self
            .queue
            .pop_front()
            .unwrap_or_else(|| Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))))
    }
}

/// Produces logical keys for the menu loop
pub trait KeyHandler {
    /// Block until a mapped key arrives
    fn wait(&mut self) -> Result<LogicalKey>;

    /// Next mapped key if one is pending
    fn poll(&mut self) -> Result<Option<LogicalKey>>;

    /// Best-effort discard of buffered input
    fn flush(&mut self) {}
}

/// Keys decoded from terminal events
pub struct TerminalKeys<S: EventSource = CrosstermEvents> {
    source: S,
    raw_per_read: bool,
}

impl TerminalKeys<CrosstermEvents> {
    /// Blocking reader for the console menu. Raw mode is held only while
    /// waiting, so prompts and printed reports behave normally in between.
    pub fn blocking() -> Self {
        Self {
            source: CrosstermEvents,
            raw_per_read: true,
        }
    }

    /// Non-blocking reader for a terminal already in raw mode
    pub fn polling() -> Self {
        Self {
            source: CrosstermEvents,
            raw_per_read: false,
        }
    }
}

impl<S: EventSource> TerminalKeys<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            raw_per_read: false,
        }
    }
}

impl<S: EventSource> KeyHandler for TerminalKeys<S> {
    fn wait(&mut self) -> Result<LogicalKey> {
        let _guard = if self.raw_per_read {
            Some(RawModeGuard::enable()?)
        } else {
            None
        };

        loop {
            if let Event::Key(key) = self.source.read_event()? {
                if let Some(logical) = map_key_event(&key) {
                    return Ok(logical);
                }
            }
        }
    }

    fn poll(&mut self) -> Result<Option<LogicalKey>> {
        while let Some(event) = self.source.poll_event()? {
            if let Event::Key(key) = event {
                if let Some(logical) = map_key_event(&key) {
                    return Ok(Some(logical));
                }
            }
        }
        Ok(None)
    }

    fn flush(&mut self) {
        for _ in 0..64 {
            match self.source.poll_event() {
                Ok(Some(_)) => {}
                _ => break,
            }
        }
    }
}

/// Logical keys replayed from a list. An idle step makes `poll` report
/// no pending key for one frame. Once the script runs out every read
/// yields `Cancel`, so the menu closes.
#[derive(Debug, Default, Clone)]
pub struct ScriptedKeys {
    queue: VecDeque<Option<LogicalKey>>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = LogicalKey>) -> Self {
        Self {
            queue: keys.into_iter().map(Some).collect(),
        }
    }

    /// Append `frames` polls that find no key
    pub fn idle(mut self, frames: usize) -> Self {
        self.queue.extend(std::iter::repeat(None).take(frames));
        self
    }

    /// Append more keys after the current script
    pub fn then(mut self, keys: impl IntoIterator<Item = LogicalKey>) -> Self {
        self.queue.extend(keys.into_iter().map(Some));
        self
    }

    /// Steps not yet replayed, idle steps included
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl KeyHandler for ScriptedKeys {
    fn wait(&mut self) -> Result<LogicalKey> {
        while let Some(step) = self.queue.pop_front() {
            if let Some(key) = step {
                return Ok(key);
            }
        }
        Ok(LogicalKey::Cancel)
    }

    fn poll(&mut self) -> Result<Option<LogicalKey>> {
        match self.queue.pop_front() {
            Some(step) => Ok(step),
            None => Ok(Some(LogicalKey::Cancel)),
        }
    }
}
