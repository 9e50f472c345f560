//! Terminal event pump for the JobDeck TUI.
//!
//! [`EventHandler`] runs in its own tokio task and multiplexes three sources
//! with a biased `tokio::select!`:
//!
//! - **Shutdown signal**: a oneshot channel that ends the loop
//! - **Tick interval**: periodic [`TuiEvent::Tick`] used to pick up store changes
//! - **Terminal input**: crossterm key, mouse and resize events, read by one
//!   long-lived reader thread and handed over through an MPSC channel
//!
//! The reader thread owns every `event::read()` call, so a tick winning the
//! `select!` never abandons a read in flight.
//!
//! Every event is forwarded to the application through an MPSC channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

/// Events that drive the TUI event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Periodic tick.
    Tick,

    /// Key press.
    Key(KeyEvent),

    /// Mouse press, drag, release or scroll.
    Mouse(MouseEvent),

    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
}

/// Default tick rate for the event handler (60ms = ~16 FPS).
pub const DEFAULT_TICK_RATE_MS: u64 = 60;

/// Poll timeout for checking terminal input. Bounds how long the reader
/// thread takes to notice it should stop.
const POLL_TIMEOUT_MS: u64 = 10;

/// Terminal events buffered between the reader thread and the pump.
const INPUT_CHANNEL_CAPACITY: usize = 256;

/// Handles terminal input and generates periodic tick events.
///
/// # Example
///
/// ```ignore
/// use tokio::sync::{mpsc, oneshot};
/// use jobdeck_dashboard::tui::EventHandler;
///
/// let (event_tx, mut event_rx) = mpsc::channel(100);
/// let (shutdown_tx, shutdown_rx) = oneshot::channel();
///
/// let handler = EventHandler::new(event_tx, shutdown_rx);
/// let event_task = tokio::spawn(handler.run());
///
/// while let Some(event) = event_rx.recv().await {
///     // handle event
/// }
///
/// let _ = shutdown_tx.send(());
/// event_task.await??;
/// ```
#[derive(Debug)]
pub struct EventHandler {
    /// Channel sender for dispatching events to the main application.
    event_tx: mpsc::Sender<TuiEvent>,
    /// Receiver for the shutdown signal.
    shutdown_rx: oneshot::Receiver<()>,
    /// Tick interval.
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a new `EventHandler` with the default tick rate.
    pub fn new(event_tx: mpsc::Sender<TuiEvent>, shutdown_rx: oneshot::Receiver<()>) -> Self {
        Self::with_tick_rate(
            event_tx,
            shutdown_rx,
            Duration::from_millis(DEFAULT_TICK_RATE_MS),
        )
    }

    /// Creates a new `EventHandler` with a custom tick rate.
    pub fn with_tick_rate(
        event_tx: mpsc::Sender<TuiEvent>,
        shutdown_rx: oneshot::Receiver<()>,
        tick_rate: Duration,
    ) -> Self {
        Self {
            event_tx,
            shutdown_rx,
            tick_rate,
        }
    }

    /// Returns the configured tick rate.
    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Starts the terminal reader thread, then forwards ticks and terminal
    /// input until shutdown is signalled or the receiving side goes away.
    ///
    /// The reader thread is told to stop on return and exits within one poll
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader thread cannot be spawned.
    pub async fn run(self) -> std::io::Result<()> {
        let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let reader_stop = Arc::clone(&stop);
        thread::Builder::new()
            .name("jobdeck-input".to_string())
            .spawn(move || Self::read_terminal(&input_tx, &reader_stop))?;

        let result = self.forward(input_rx).await;
        stop.store(true, Ordering::Relaxed);
        result
    }

    /// The pump loop. Only channel receives and the tick interval are
    /// awaited here; none of them lose data when another branch wins.
    async fn forward(mut self, mut input_rx: mpsc::Receiver<TuiEvent>) -> std::io::Result<()> {
        let mut ticks = tokio::time::interval(self.tick_rate);
        ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // Skip the immediate first tick.
        ticks.tick().await;
        let mut input_open = true;

        loop {
            let event = tokio::select! {
                biased;

                _ = &mut self.shutdown_rx => {
                    debug!("Event handler shutting down");
                    return Ok(());
                }
                _ = ticks.tick() => TuiEvent::Tick,
                input = input_rx.recv(), if input_open => match input {
                    Some(event) => event,
                    None => {
                        debug!("Terminal reader stopped, ticks only");
                        input_open = false;
                        continue;
                    }
                },
            };

            if self.event_tx.send(event).await.is_err() {
                debug!("Event receiver dropped, stopping event handler");
                return Ok(());
            }
        }
    }

    /// Reader thread body: polls the terminal and hands every event to the
    /// pump until `stop` is set or the pump goes away.
    fn read_terminal(input_tx: &mpsc::Sender<TuiEvent>, stop: &AtomicBool) {
        let timeout = Duration::from_millis(POLL_TIMEOUT_MS);
        while !stop.load(Ordering::Relaxed) {
            let event = match Self::poll_terminal_event(timeout) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    // No tty (tests, CI): back off instead of spinning.
                    trace!(error = %e, "Failed to poll terminal");
                    thread::sleep(timeout);
                    continue;
                }
            };
            if input_tx.blocking_send(event).is_err() {
                break;
            }
        }
        trace!("Terminal reader exiting");
    }

    /// Waits up to `timeout` for one terminal event.
    fn poll_terminal_event(timeout: Duration) -> std::io::Result<Option<TuiEvent>> {
        if event::poll(timeout)? {
            Ok(Self::convert_crossterm_event(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Converts a crossterm event, dropping key releases and focus/paste events.
    fn convert_crossterm_event(event: CrosstermEvent) -> Option<TuiEvent> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Release => None,
            CrosstermEvent::Key(key) => Some(TuiEvent::Key(key)),
            CrosstermEvent::Mouse(mouse) => Some(TuiEvent::Mouse(mouse)),
            CrosstermEvent::Resize(cols, rows) => Some(TuiEvent::Resize(cols, rows)),
            CrosstermEvent::FocusGained | CrosstermEvent::FocusLost => None,
            CrosstermEvent::Paste(_) => None,
        }
    }
}
