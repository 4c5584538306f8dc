//! Terminal control: screen clearing, input flushing, raw mode and TUI setup

use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Upper bound on buffered events discarded by `flush_input`
const MAX_FLUSHED_EVENTS: usize = 64;

/// Clear the whole screen and move the cursor to the top-left corner
pub fn clear_screen<W: Write>(out: &mut W) -> Result<()> {
    execute!(out, Clear(ClearType::All), Clear(ClearType::Purge), MoveTo(0, 0))?;
    Ok(())
}

/// Discard pending input events. Errors are ignored.
pub fn flush_input() {
    for _ in 0..MAX_FLUSHED_EVENTS {
        match event::poll(Duration::ZERO) {
            Ok(true) => {
                let _ = event::read();
            }
            _ => break,
        }
    }
}

/// Raw mode for the lifetime of the guard
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn enable() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Setup terminal for TUI rendering with panic-safe cleanup
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;

    // Install panic hook for clean terminal restoration
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        teardown_terminal();
        original_hook(panic_info);
    }));

    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn teardown_terminal() {
    let _ = stdout().execute(DisableMouseCapture);
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
}
