//! Terminal setup and RAII restoration for the JobDeck TUI.
//!
//! [`Tui`] wraps a ratatui terminal. Creating it enables raw mode, enters the
//! alternate screen, hides the cursor and turns on mouse capture (needed for
//! drag gestures). Dropping it undoes all of that.
//!
//! [`Tui::restore`] does the same explicitly and reports failures, and
//! [`install_panic_hook`] covers panics that unwind past the wrapper.
//!
//! # Example
//!
//! ```ignore
//! use jobdeck_dashboard::tui::{install_panic_hook, Tui};
//!
//! install_panic_hook();
//!
//! let mut tui = Tui::new()?;
//! tui.draw(|frame| {
//!     // render widgets to frame
//! })?;
//! ```

use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    cursor::{Hide, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Undoes everything [`Tui::new`] set up, stopping at the first failure.
fn leave_terminal() -> io::Result<()> {
    execute!(io::stdout(), DisableMouseCapture, Show, LeaveAlternateScreen)?;
    disable_raw_mode()
}

/// Installs a panic hook that puts the terminal back before the panic
/// message is printed.
///
/// Call once at startup, before creating a [`Tui`]. The previous hook still
/// runs afterwards, so the message lands in the normal screen buffer.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = leave_terminal();
        previous(info);
    }));
}

/// Raw-mode terminal with mouse capture, restored on drop.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Set once the terminal has been handed back to the shell.
    restored: bool,
}

impl Tui {
    /// Switches the terminal into dashboard mode.
    ///
    /// # Errors
    ///
    /// Returns the first failing setup step. Partial setup is rolled back.
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;

        let terminal = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)
            .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())));

        match terminal {
            Ok(terminal) => Ok(Self {
                terminal,
                restored: false,
            }),
            Err(e) => {
                let _ = leave_terminal();
                Err(e)
            }
        }
    }

    /// Draws one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(render).map(|_| ())
    }

    /// Returns the terminal size as `(columns, rows)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be queried.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        self.terminal
            .size()
            .map(|size| (size.width, size.height))
    }

    /// Hands the terminal back to the shell. Later calls are no-ops.
    ///
    /// # Errors
    ///
    /// Unlike [`Drop`], failures are reported to the caller.
    pub fn restore(&mut self) -> io::Result<()> {
        if std::mem::replace(&mut self.restored, true) {
            return Ok(());
        }
        leave_terminal()
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if !self.restored {
            let _ = leave_terminal();
        }
    }
}
