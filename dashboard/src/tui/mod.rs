//! Terminal user interface for the JobDeck dashboard.
//!
//! The TUI renders the visible widgets as cards, lets the user customize
//! the layout in a modal (toggle, resize, drag to reorder, add, reset) and
//! floats a draggable assistant bubble above everything.
//!
//! # Architecture
//!
//! - **App** (`app`): state and input handling over the layout and metrics stores
//! - **Customize** (`customize`): modal state, including the drag preview
//! - **Bubble** (`bubble`): the single-instance floating assistant
//! - **Event** (`event`): terminal events and ticks on an mpsc channel
//! - **UI** (`ui`): frame composition
//! - **Terminal** (`terminal`): raw mode, alternate screen and panic handling
//! - **Widgets** (`widgets`): ratatui widgets for each piece of the screen
//!
//! # Usage
//!
//! ```no_run
//! # async fn demo(app: jobdeck_dashboard::tui::App) -> Result<(), jobdeck_dashboard::error::TuiError> {
//! use std::time::Duration;
//!
//! jobdeck_dashboard::tui::run(app, Duration::from_millis(60)).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod bubble;
pub mod customize;
pub mod event;
pub mod terminal;
pub mod ui;
pub mod widgets;

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::TuiError;

pub use app::{App, Screen, Symbols, Theme, ASCII_SYMBOLS, UNICODE_SYMBOLS};
pub use bubble::AssistantBubble;
pub use customize::{CustomizeModal, DragState, ModalMode};
pub use event::{EventHandler, TuiEvent};
pub use terminal::{install_panic_hook, Tui};

/// Capacity of the event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Runs the TUI until the user quits.
///
/// The terminal is restored before returning, including on error.
///
/// # Errors
///
/// Returns [`TuiError::TerminalInit`] if the terminal cannot be set up,
/// [`TuiError::Render`] if drawing a frame fails, or [`TuiError::Event`] if
/// the event reader stopped with an error.
pub async fn run(mut app: App, tick_rate: Duration) -> Result<(), TuiError> {
    install_panic_hook();
    let mut tui = Tui::new().map_err(TuiError::TerminalInit)?;

    let (event_tx, mut event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let event_task =
        tokio::spawn(EventHandler::with_tick_rate(event_tx, shutdown_rx, tick_rate).run());

    info!(tick_rate_ms = tick_rate.as_millis() as u64, "TUI started");

    let result = drive(&mut tui, &mut app, &mut event_rx).await;

    let _ = shutdown_tx.send(());
    drop(event_rx);
    let handler_result = match event_task.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(TuiError::Event(e.to_string())),
        Err(e) => Err(TuiError::Event(format!("event task panicked: {e}"))),
    };

    if let Err(e) = tui.restore() {
        warn!(error = %e, "Failed to restore terminal");
    }
    info!("TUI stopped");
    result.and(handler_result)
}

async fn drive(
    tui: &mut Tui,
    app: &mut App,
    events: &mut mpsc::Receiver<TuiEvent>,
) -> Result<(), TuiError> {
    let (width, height) = tui.size().map_err(TuiError::Render)?;
    app.resize(width, height);
    app.take_dirty();
    tui.draw(|frame| ui::render(frame, app))
        .map_err(TuiError::Render)?;

    while let Some(event) = events.recv().await {
        app.handle_event(event);
        if app.should_quit {
            debug!("Quit requested");
            break;
        }
        if app.take_dirty() {
            tui.draw(|frame| ui::render(frame, app))
                .map_err(TuiError::Render)?;
        }
    }

    Ok(())
}
