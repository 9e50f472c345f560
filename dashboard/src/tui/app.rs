//! Application state and input handling for the JobDeck TUI.
//!
//! The main types are:
//!
//! - [`App`]: owns the stores and all UI state, and reacts to [`TuiEvent`]s
//! - [`Screen`]: the dashboard or the customization modal on top of it
//! - [`Theme`] and [`Symbols`]: styling, with `NO_COLOR` and ASCII fallbacks
//!
//! # State Machine
//!
//! ```text
//! +-----------+    'c'     +-----------+
//! | Dashboard | ---------> | Customize |
//! +-----------+ <--------- +-----------+
//!                   Esc
//! ```
//!
//! The assistant bubble floats above either screen and is toggled with `a`.
//!
//! # Store Changes
//!
//! The dashboard view is driven by the stores' watch channels: every tick
//! checks for committed layout or metrics changes and refreshes the cached
//! view, marking the frame dirty.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::layout::{LayoutStore, StoreError};
use crate::metrics::MetricsStore;
use crate::singleton::SingletonRegistry;
use crate::tui::bubble::AssistantBubble;
use crate::tui::customize::{drop_target_index, CustomizeModal, ModalMode};
use crate::tui::event::TuiEvent;
use crate::tui::widgets::customize_modal::{list_area, modal_area};
use crate::types::{UserMetrics, WidgetInstance};

/// Columns the bubble moves per key press.
const BUBBLE_STEP_X: i32 = 2;

/// Rows the bubble moves per key press.
const BUBBLE_STEP_Y: i32 = 1;

// =============================================================================
// Screen
// =============================================================================

/// Current screen being displayed in the TUI.
///
/// # Example
///
/// ```
/// use jobdeck_dashboard::tui::Screen;
///
/// assert_eq!(Screen::default(), Screen::Dashboard);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Stacked widget cards.
    #[default]
    Dashboard,
    /// The customization modal over the dashboard.
    Customize,
}

// =============================================================================
// Theme
// =============================================================================

/// Color theme for the TUI.
///
/// # Example
///
/// ```
/// use jobdeck_dashboard::tui::Theme;
///
/// let theme = Theme::default();
/// let mono_theme = Theme::monochrome();
/// let env_theme = Theme::from_env();
/// ```
#[derive(Debug, Clone)]
pub struct Theme {
    // Cards
    /// Style for card titles (default: white bold).
    pub card_title: Style,
    /// Style for card headlines (default: reset bold).
    pub card_headline: Style,
    /// Style for the size badge on cards and modal rows (default: cyan).
    pub size_badge: Style,
    /// Style for progress gauges (default: green on dark gray).
    pub gauge: Style,

    // Customization modal
    /// Style for the highlighted row (default: black on cyan).
    pub selection: Style,
    /// Style for the row being dragged (default: black on yellow).
    pub drag: Style,
    /// Style for hidden widgets (default: dark gray).
    pub hidden: Style,
    /// Style for destructive confirmations (default: red bold).
    pub danger: Style,

    // Chrome
    /// Style for key labels in hints (default: cyan bold).
    pub key: Style,
    /// Style for the assistant bubble border (default: magenta).
    pub bubble: Style,
    /// Style for unfocused borders (default: dark gray).
    pub border: Style,
    /// Style for focused borders (default: cyan).
    pub border_focused: Style,
    /// Style for titles (default: white bold).
    pub title: Style,
    /// Style for primary text (default: terminal default).
    pub text_primary: Style,
    /// Style for secondary text (default: gray).
    pub text_secondary: Style,
    /// Style for muted text (default: dark gray).
    pub text_muted: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            card_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            card_headline: Style::default().add_modifier(Modifier::BOLD),
            size_badge: Style::default().fg(Color::Cyan),
            gauge: Style::default().fg(Color::Green).bg(Color::DarkGray),

            selection: Style::default().fg(Color::Black).bg(Color::Cyan),
            drag: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            hidden: Style::default().fg(Color::DarkGray),
            danger: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            key: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            bubble: Style::default().fg(Color::Magenta),
            border: Style::default().fg(Color::DarkGray),
            border_focused: Style::default().fg(Color::Cyan),
            title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            text_primary: Style::default(),
            text_secondary: Style::default().fg(Color::Gray),
            text_muted: Style::default().fg(Color::DarkGray),
        }
    }
}

impl Theme {
    /// Creates a monochrome theme for `NO_COLOR` support.
    ///
    /// Only modifiers are used, following the [NO_COLOR standard](https://no-color.org/).
    #[must_use]
    pub fn monochrome() -> Self {
        Self {
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_headline: Style::default().add_modifier(Modifier::BOLD),
            size_badge: Style::default(),
            gauge: Style::default().add_modifier(Modifier::REVERSED),

            selection: Style::default().add_modifier(Modifier::REVERSED),
            drag: Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
            hidden: Style::default().add_modifier(Modifier::DIM),
            danger: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),

            key: Style::default().add_modifier(Modifier::BOLD),
            bubble: Style::default(),
            border: Style::default(),
            border_focused: Style::default().add_modifier(Modifier::BOLD),
            title: Style::default().add_modifier(Modifier::BOLD),
            text_primary: Style::default(),
            text_secondary: Style::default().add_modifier(Modifier::DIM),
            text_muted: Style::default().add_modifier(Modifier::DIM),
        }
    }

    /// Returns [`Theme::monochrome()`] if `no_color` is set, the default otherwise.
    #[must_use]
    pub fn for_no_color(no_color: bool) -> Self {
        if no_color {
            Self::monochrome()
        } else {
            Self::default()
        }
    }

    /// Creates a theme based on the `NO_COLOR` environment variable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::for_no_color(std::env::var_os("NO_COLOR").is_some())
    }
}

// =============================================================================
// Symbols
// =============================================================================

/// Symbol set for the TUI (unicode or ASCII).
///
/// # Example
///
/// ```
/// use jobdeck_dashboard::tui::{ASCII_SYMBOLS, UNICODE_SYMBOLS};
///
/// assert_eq!(UNICODE_SYMBOLS.visible, "●");
/// assert_eq!(ASCII_SYMBOLS.visible, "[x]");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Symbols {
    /// Marker for visible widgets.
    pub visible: &'static str,
    /// Marker for hidden widgets.
    pub hidden: &'static str,
    /// Grip drawn before reorderable rows.
    pub drag_handle: &'static str,
    /// Arrow for navigation/direction.
    pub arrow: &'static str,
    /// Bullet point for lists.
    pub bullet: &'static str,
    /// Hint that more cards are below the fold.
    pub more_below: &'static str,
}

/// Unicode symbol set for modern terminals.
pub const UNICODE_SYMBOLS: Symbols = Symbols {
    visible: "●",
    hidden: "○",
    drag_handle: "⠿",
    arrow: "→",
    bullet: "•",
    more_below: "▼",
};

/// ASCII symbol set for maximum compatibility.
pub const ASCII_SYMBOLS: Symbols = Symbols {
    visible: "[x]",
    hidden: "[ ]",
    drag_handle: "::",
    arrow: "->",
    bullet: "*",
    more_below: "v",
};

impl Symbols {
    /// Returns [`ASCII_SYMBOLS`] on the Linux console or VT100, unicode otherwise.
    #[must_use]
    pub fn detect() -> Self {
        if std::env::var("TERM")
            .map(|t| t.contains("linux") || t.contains("vt100"))
            .unwrap_or(false)
        {
            ASCII_SYMBOLS
        } else {
            UNICODE_SYMBOLS
        }
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Self::detect()
    }
}

// =============================================================================
// App
// =============================================================================

/// Application state for the JobDeck TUI.
///
/// Both stores must be loaded before the app is constructed.
pub struct App {
    /// Current screen.
    pub screen: Screen,
    /// Layout store; the source of truth for widget placement.
    pub layout: LayoutStore,
    /// Metrics store.
    pub metrics: MetricsStore,
    /// Active feature flags.
    pub feature_flags: Vec<String>,
    /// Open customization modal (present when `screen == Customize`).
    pub customize: Option<CustomizeModal>,
    /// Open assistant bubble.
    pub bubble: Option<AssistantBubble>,
    /// Single-instance registrations.
    pub singletons: SingletonRegistry,
    /// Index of the first visible card on the dashboard.
    pub scroll: usize,
    /// Last known terminal area.
    pub viewport: Rect,
    /// Flag indicating the user requested exit.
    pub should_quit: bool,
    /// Theme configuration.
    pub theme: Theme,
    /// Symbol set.
    pub symbols: Symbols,
    /// Transient message shown in the footer.
    pub status: Option<String>,

    visible: Vec<WidgetInstance>,
    current_metrics: UserMetrics,
    layout_rx: watch::Receiver<Vec<WidgetInstance>>,
    metrics_rx: watch::Receiver<UserMetrics>,
    dirty: bool,
}

impl App {
    /// Creates the app over loaded stores.
    #[must_use]
    pub fn new(
        layout: LayoutStore,
        metrics: MetricsStore,
        feature_flags: Vec<String>,
        singletons: SingletonRegistry,
    ) -> Self {
        let layout_rx = layout.subscribe();
        let metrics_rx = metrics.subscribe();

        Self {
            screen: Screen::Dashboard,
            visible: layout.get_visible_widgets(),
            current_metrics: metrics.metrics(),
            layout,
            metrics,
            feature_flags,
            customize: None,
            bubble: None,
            singletons,
            scroll: 0,
            viewport: Rect::default(),
            should_quit: false,
            theme: Theme::default(),
            symbols: Symbols::default(),
            status: None,
            layout_rx,
            metrics_rx,
            dirty: true,
        }
    }

    /// Replaces the theme and symbol set.
    #[must_use]
    pub fn with_style(mut self, theme: Theme, symbols: Symbols) -> Self {
        self.theme = theme;
        self.symbols = symbols;
        self
    }

    /// Visible widgets, in render order, as of the last refresh.
    #[must_use]
    pub fn visible_widgets(&self) -> &[WidgetInstance] {
        &self.visible
    }

    /// Metrics as of the last refresh.
    #[must_use]
    pub fn current_metrics(&self) -> &UserMetrics {
        &self.current_metrics
    }

    /// Returns and clears the redraw flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Requests exit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Dispatches one event.
    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Tick => {
                self.refresh_from_stores();
            }
            TuiEvent::Key(key) => {
                self.handle_key(key);
                self.refresh_from_stores();
                self.dirty = true;
            }
            TuiEvent::Mouse(mouse) => {
                self.handle_mouse(mouse);
                self.refresh_from_stores();
                self.dirty = true;
            }
            TuiEvent::Resize(width, height) => self.resize(width, height),
        }
    }

    /// Records the new terminal size and keeps the bubble on screen.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Rect::new(0, 0, width, height);
        if let Some(bubble) = self.bubble.as_mut() {
            bubble.clamp_to(self.viewport);
        }
        self.dirty = true;
    }

    /// Pulls committed changes from the store channels.
    ///
    /// Returns `true` if anything changed.
    pub fn refresh_from_stores(&mut self) -> bool {
        let mut changed = false;

        if self.layout_rx.has_changed().unwrap_or(false) {
            self.layout_rx.borrow_and_update();
            self.visible = self.layout.get_visible_widgets();
            self.scroll = self.scroll.min(self.visible.len().saturating_sub(1));
            if let Some(modal) = self.customize.as_mut() {
                if modal.drag().is_none() {
                    modal.sync_from(&self.layout);
                }
            }
            changed = true;
        }

        if self.metrics_rx.has_changed().unwrap_or(false) {
            self.current_metrics = *self.metrics_rx.borrow_and_update();
            changed = true;
        }

        if changed {
            self.dirty = true;
        }
        changed
    }

    // ============================================
    // Screens and Overlays
    // ============================================

    /// Opens the customization modal.
    pub fn open_customize(&mut self) {
        self.customize = Some(CustomizeModal::open(
            &self.layout,
            self.feature_flags.clone(),
        ));
        self.screen = Screen::Customize;
        debug!("Customization modal opened");
    }

    /// Closes the customization modal, discarding any uncommitted drag.
    pub fn close_customize(&mut self) {
        self.customize = None;
        self.screen = Screen::Dashboard;
        debug!("Customization modal closed");
    }

    /// Opens the assistant bubble, or closes it if already open.
    pub fn toggle_bubble(&mut self) {
        if self.bubble.take().is_some() {
            return;
        }
        self.bubble = AssistantBubble::open(&self.singletons, self.viewport);
        if self.bubble.is_none() {
            self.status = Some("Assistant is already open".to_string());
        }
    }

    /// Footer key hints for the current state.
    #[must_use]
    pub fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        match (&self.screen, self.customize.as_ref().map(CustomizeModal::mode)) {
            (Screen::Customize, Some(ModalMode::ConfirmReset)) => {
                &[("y", "reset"), ("n", "keep layout")]
            }
            (Screen::Customize, Some(ModalMode::Adding { .. })) => {
                &[("↑↓", "choose"), ("enter", "add"), ("esc", "back")]
            }
            (Screen::Customize, _) if self.is_dragging() => &[
                ("↑↓", "move"),
                ("space", "drop"),
                ("esc", "cancel"),
            ],
            (Screen::Customize, _) => &[
                ("↑↓", "select"),
                ("enter", "show/hide"),
                ("s", "size"),
                ("space", "drag"),
                ("a", "add"),
                ("r", "reset"),
                ("esc", "done"),
            ],
            (Screen::Dashboard, _) if self.bubble.is_some() => &[
                ("shift+↑↓←→", "move assistant"),
                ("a", "close assistant"),
                ("c", "customize"),
                ("q", "quit"),
            ],
            (Screen::Dashboard, _) => &[
                ("↑↓", "scroll"),
                ("c", "customize"),
                ("a", "assistant"),
                ("q", "quit"),
            ],
        }
    }

    fn is_dragging(&self) -> bool {
        self.customize
            .as_ref()
            .is_some_and(|modal| modal.drag().is_some())
    }

    fn report(&mut self, result: Result<(), StoreError>) {
        if let Err(e) = result {
            warn!(error = %e, "Layout action rejected");
            self.status = Some(e.to_string());
        }
    }

    // ============================================
    // Keyboard
    // ============================================

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }
        self.status = None;

        if key.modifiers.contains(KeyModifiers::SHIFT) && self.move_bubble_with_key(key.code) {
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Customize => self.handle_customize_key(key),
        }
    }

    fn move_bubble_with_key(&mut self, code: KeyCode) -> bool {
        let Some(bubble) = self.bubble.as_mut() else {
            return false;
        };
        let (dx, dy) = match code {
            KeyCode::Left => (-BUBBLE_STEP_X, 0),
            KeyCode::Right => (BUBBLE_STEP_X, 0),
            KeyCode::Up => (0, -BUBBLE_STEP_Y),
            KeyCode::Down => (0, BUBBLE_STEP_Y),
            _ => return false,
        };
        bubble.move_by(dx, dy, self.viewport);
        true
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Esc if self.bubble.is_some() => self.bubble = None,
            KeyCode::Esc => self.quit(),
            KeyCode::Char('c') => self.open_customize(),
            KeyCode::Char('a') => self.toggle_bubble(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = (self.scroll + 1).min(self.visible.len().saturating_sub(1));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn handle_customize_key(&mut self, key: KeyEvent) {
        let Some(mut modal) = self.customize.take() else {
            self.screen = Screen::Dashboard;
            return;
        };
        let mut keep_open = true;

        match modal.mode() {
            ModalMode::ConfirmReset => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    let result = modal.confirm_reset(&mut self.layout);
                    self.report(result);
                    self.scroll = 0;
                }
                KeyCode::Char('n') | KeyCode::Esc => modal.cancel_reset(),
                _ => {}
            },
            ModalMode::Adding { .. } => {
                let addable = modal.addable_widgets(&self.layout).len();
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => modal.select_addable_by(-1, addable),
                    KeyCode::Down | KeyCode::Char('j') => modal.select_addable_by(1, addable),
                    KeyCode::Enter => {
                        let result = modal.add_selected(&mut self.layout);
                        self.report(result);
                    }
                    KeyCode::Esc => modal.cancel_add(),
                    _ => {}
                }
            }
            ModalMode::Browse if modal.drag().is_some() => match key.code {
                KeyCode::Up | KeyCode::Char('k') => modal.move_drag(-1),
                KeyCode::Down | KeyCode::Char('j') => modal.move_drag(1),
                KeyCode::Char(' ') | KeyCode::Enter => {
                    let result = modal.drop_drag(&mut self.layout);
                    self.report(result);
                }
                KeyCode::Esc => modal.cancel_drag(&self.layout),
                _ => {}
            },
            ModalMode::Browse => match key.code {
                KeyCode::Up | KeyCode::Char('k') => modal.select_by(-1),
                KeyCode::Down | KeyCode::Char('j') => modal.select_by(1),
                KeyCode::Enter | KeyCode::Char('v') => {
                    let result = modal.toggle_visibility(&mut self.layout);
                    self.report(result);
                }
                KeyCode::Char('s') => {
                    let result = modal.cycle_size(&mut self.layout);
                    self.report(result);
                }
                KeyCode::Char(' ') => modal.begin_drag(),
                KeyCode::Char('a') => modal.begin_add(),
                KeyCode::Char('r') => modal.request_reset(),
                KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => keep_open = false,
                _ => {}
            },
        }

        if keep_open {
            self.customize = Some(modal);
        } else {
            self.close_customize();
        }
    }

    // ============================================
    // Mouse
    // ============================================

    /// Handles a mouse event.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.handle_bubble_mouse(mouse) {
            return;
        }
        match self.screen {
            Screen::Dashboard => match mouse.kind {
                MouseEventKind::ScrollDown => {
                    self.scroll = (self.scroll + 1).min(self.visible.len().saturating_sub(1));
                }
                MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
                _ => {}
            },
            Screen::Customize => self.handle_customize_mouse(mouse),
        }
    }

    fn handle_bubble_mouse(&mut self, mouse: MouseEvent) -> bool {
        let viewport = self.viewport;
        let Some(bubble) = self.bubble.as_mut() else {
            return false;
        };
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => bubble.begin_drag(mouse.column, mouse.row),
            MouseEventKind::Drag(MouseButton::Left) if bubble.is_dragging() => {
                bubble.drag_to(mouse.column, mouse.row, viewport);
                true
            }
            MouseEventKind::Up(MouseButton::Left) if bubble.is_dragging() => {
                bubble.end_drag();
                true
            }
            _ => false,
        }
    }

    fn handle_customize_mouse(&mut self, mouse: MouseEvent) {
        let Some(mut modal) = self.customize.take() else {
            return;
        };

        if modal.mode() == ModalMode::Browse {
            let list = list_area(modal_area(self.viewport, modal.items().len()));
            let len = modal.items().len();
            let target = drop_target_index(mouse.row, list.y, 1, len);

            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) if list.contains((mouse.column, mouse.row).into()) => {
                    modal.select(target);
                    modal.begin_drag();
                }
                MouseEventKind::Drag(MouseButton::Left) if modal.drag().is_some() => {
                    modal.drag_to(target);
                }
                MouseEventKind::Up(MouseButton::Left) if modal.drag().is_some() => {
                    modal.drag_to(target);
                    let result = modal.drop_drag(&mut self.layout);
                    self.report(result);
                }
                _ => {}
            }
        }

        self.customize = Some(modal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossterm::event::KeyEventState;

    use crate::registry::WidgetRegistry;
    use crate::storage::MemoryStorage;
    use crate::tui::bubble::ASSISTANT_SINGLETON;

    fn test_app() -> App {
        let storage = Arc::new(MemoryStorage::new());
        let mut layout = LayoutStore::new(storage.clone(), Arc::new(WidgetRegistry::builtin()));
        layout.load("alice");
        let mut metrics = MetricsStore::new(storage);
        metrics.load("alice");

        let mut app = App::new(layout, metrics, Vec::new(), SingletonRegistry::new());
        app.resize(80, 30);
        app
    }

    fn key(code: KeyCode) -> TuiEvent {
        TuiEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn shift(code: KeyCode) -> TuiEvent {
        TuiEvent::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::SHIFT,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> TuiEvent {
        TuiEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    // ============================================
    // Theme and Symbols
    // ============================================

    #[test]
    fn monochrome_theme_has_no_colors() {
        let theme = Theme::monochrome();
        assert_eq!(theme.selection.fg, None);
        assert_eq!(theme.selection.bg, None);
        assert!(theme.selection.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn for_no_color_selects_theme() {
        assert_eq!(Theme::for_no_color(true).gauge, Theme::monochrome().gauge);
        assert_eq!(Theme::for_no_color(false).gauge, Theme::default().gauge);
    }

    #[test]
    fn ascii_symbols_are_ascii() {
        for symbol in [
            ASCII_SYMBOLS.visible,
            ASCII_SYMBOLS.hidden,
            ASCII_SYMBOLS.drag_handle,
            ASCII_SYMBOLS.arrow,
            ASCII_SYMBOLS.bullet,
            ASCII_SYMBOLS.more_below,
        ] {
            assert!(symbol.is_ascii());
        }
    }

    // ============================================
    // Dashboard
    // ============================================

    #[test]
    fn starts_on_dashboard_with_default_cards() {
        let app = test_app();

        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(app.visible_widgets().len(), 6);
        assert!(!app.should_quit);
    }

    #[test]
    fn q_quits() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_from_modal() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('c')));
        app.handle_event(TuiEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.should_quit);
    }

    #[test]
    fn scroll_is_bounded() {
        let mut app = test_app();
        for _ in 0..20 {
            app.handle_event(key(KeyCode::Down));
        }
        assert_eq!(app.scroll, 5);

        for _ in 0..20 {
            app.handle_event(key(KeyCode::Up));
        }
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn take_dirty_clears_flag() {
        let mut app = test_app();
        assert!(app.take_dirty());
        assert!(!app.take_dirty());

        app.handle_event(TuiEvent::Tick);
        assert!(!app.take_dirty());
    }

    // ============================================
    // Customization
    // ============================================

    #[test]
    fn customize_toggle_updates_dashboard() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('c')));
        assert_eq!(app.screen, Screen::Customize);

        app.handle_event(key(KeyCode::Enter));

        assert_eq!(app.visible_widgets().len(), 5);
        assert!(!app.layout.widget("overallProgress").unwrap().visible);
    }

    #[test]
    fn customize_keyboard_drag_reorders() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('c')));

        app.handle_event(key(KeyCode::Char(' ')));
        app.handle_event(key(KeyCode::Down));
        app.handle_event(key(KeyCode::Down));
        app.handle_event(key(KeyCode::Char(' ')));

        assert_eq!(app.visible_widgets()[2].id, "overallProgress");
        assert_eq!(app.visible_widgets()[0].id, "quickStats");
    }

    #[test]
    fn esc_cancels_drag_before_closing() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('c')));
        app.handle_event(key(KeyCode::Char(' ')));
        app.handle_event(key(KeyCode::Down));

        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Customize);
        assert_eq!(app.layout.widgets()[0].id, "overallProgress");

        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.customize.is_none());
    }

    #[test]
    fn reset_goes_through_confirmation() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('c')));
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.visible_widgets().len(), 5);

        app.handle_event(key(KeyCode::Char('r')));
        app.handle_event(key(KeyCode::Char('n')));
        assert_eq!(app.visible_widgets().len(), 5);

        app.handle_event(key(KeyCode::Char('r')));
        app.handle_event(key(KeyCode::Char('y')));
        assert_eq!(app.visible_widgets().len(), 6);
    }

    #[test]
    fn add_picker_adds_streaks() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('c')));

        app.handle_event(key(KeyCode::Char('a')));
        app.handle_event(key(KeyCode::Enter));

        assert_eq!(app.visible_widgets().last().unwrap().id, "streaks");
    }

    #[test]
    fn mouse_drag_reorders_rows() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('c')));
        let list = list_area(modal_area(app.viewport, 8));

        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), list.x + 1, list.y));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), list.x + 1, list.y + 3));
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), list.x + 1, list.y + 3));

        assert_eq!(app.layout.widgets()[3].id, "overallProgress");
    }

    #[test]
    fn mouse_release_past_list_clamps_to_last() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('c')));
        let list = list_area(modal_area(app.viewport, 8));

        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), list.x + 1, list.y));
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), list.x + 1, 29));

        assert_eq!(app.layout.widgets()[7].id, "overallProgress");
    }

    // ============================================
    // Assistant Bubble
    // ============================================

    #[test]
    fn bubble_toggles_and_claims_singleton() {
        let mut app = test_app();

        app.handle_event(key(KeyCode::Char('a')));
        assert!(app.bubble.is_some());
        assert!(app.singletons.is_active(ASSISTANT_SINGLETON));

        app.handle_event(key(KeyCode::Char('a')));
        assert!(app.bubble.is_none());
        assert!(!app.singletons.is_active(ASSISTANT_SINGLETON));
    }

    #[test]
    fn bubble_refuses_second_instance() {
        let mut app = test_app();
        let _elsewhere = app.singletons.register(ASSISTANT_SINGLETON).unwrap();

        app.handle_event(key(KeyCode::Char('a')));

        assert!(app.bubble.is_none());
        assert!(app.status.is_some());
    }

    #[test]
    fn shift_arrows_move_bubble_within_screen() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('a')));
        let (x, y) = app.bubble.as_ref().unwrap().position();

        app.handle_event(shift(KeyCode::Left));
        app.handle_event(shift(KeyCode::Down));

        let (nx, ny) = app.bubble.as_ref().unwrap().position();
        assert_eq!(nx, x - 2);
        assert_eq!(ny, y);
    }

    #[test]
    fn resize_keeps_bubble_on_screen() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('a')));

        app.handle_event(TuiEvent::Resize(40, 10));

        let area = app.bubble.as_ref().unwrap().area(app.viewport);
        assert!(area.right() <= 40);
        assert!(area.bottom() <= 10);
    }

    #[test]
    fn metrics_changes_reach_the_view() {
        let mut app = test_app();
        app.metrics
            .update_metrics(crate::types::MetricsUpdate {
                streak_days: Some(6),
                ..Default::default()
            })
            .unwrap();

        assert!(app.refresh_from_stores());
        assert_eq!(app.current_metrics().streak_days, 6);
    }
}
