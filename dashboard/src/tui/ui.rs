//! Frame composition for the JobDeck TUI.
//!
//! ```text
//! render() --> header | dashboard grid | key hints
//!          --> Customize?      customize modal overlay
//!          --> ConfirmReset?   confirm dialog overlay
//!          --> bubble open?    assistant bubble on top
//! ```
//!
//! Overlays are drawn last so they always sit above the dashboard.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::tui::app::{App, Screen};
use crate::tui::customize::ModalMode;
use crate::tui::widgets::{
    AssistantBubbleWidget, ConfirmDialogWidget, CustomizeModalWidget, DashboardGridWidget,
    HeaderWidget, KeyHintsWidget, HEADER_HEIGHT, KEY_HINTS_HEIGHT,
};

/// Title of the reset confirmation.
const RESET_TITLE: &str = "Reset layout";

/// Body of the reset confirmation.
const RESET_MESSAGE: &str = "Restore the default widgets?";

/// Renders the whole frame for the current application state.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(KEY_HINTS_HEIGHT),
        ])
        .split(area);

    let user_id = app.layout.user_id().unwrap_or_default();
    frame.render_widget(
        HeaderWidget::new(
            user_id,
            app.visible_widgets().len(),
            app.layout.widgets().len(),
            &app.theme,
            &app.symbols,
        ),
        chunks[0],
    );

    render_dashboard(frame, app, chunks[1]);

    frame.render_widget(
        KeyHintsWidget::new(app.key_hints(), app.status.as_deref(), &app.theme),
        chunks[2],
    );

    if app.screen == Screen::Customize {
        if let Some(modal) = app.customize.as_ref() {
            frame.render_widget(
                CustomizeModalWidget::new(modal, &app.layout, &app.theme, &app.symbols),
                area,
            );
            if modal.mode() == ModalMode::ConfirmReset {
                frame.render_widget(
                    ConfirmDialogWidget::new(RESET_TITLE, RESET_MESSAGE, &app.theme),
                    area,
                );
            }
        }
    }

    if let Some(bubble) = app.bubble.as_ref() {
        frame.render_widget(
            AssistantBubbleWidget::new(&app.theme, &app.symbols),
            bubble.area(area),
        );
    }
}

/// Renders the visible widgets as cards. Widgets missing from the registry
/// are skipped.
fn render_dashboard(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let registry = app.layout.registry();
    let cards = app
        .visible_widgets()
        .iter()
        .filter_map(|instance| {
            registry
                .get_widget_by_id(&instance.id)
                .map(|definition| (definition, instance))
        })
        .collect();

    frame.render_widget(
        DashboardGridWidget::new(
            cards,
            app.current_metrics(),
            app.scroll,
            &app.theme,
            &app.symbols,
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    use crate::layout::LayoutStore;
    use crate::metrics::MetricsStore;
    use crate::registry::WidgetRegistry;
    use crate::singleton::SingletonRegistry;
    use crate::storage::MemoryStorage;
    use crate::tui::app::{Theme, ASCII_SYMBOLS};
    use crate::tui::event::TuiEvent;

    fn create_app(width: u16, height: u16) -> App {
        let storage = Arc::new(MemoryStorage::new());
        let mut layout = LayoutStore::new(storage.clone(), Arc::new(WidgetRegistry::builtin()));
        layout.load("alice");
        let mut metrics = MetricsStore::new(storage);
        metrics.load("alice");

        let mut app = App::new(layout, metrics, Vec::new(), SingletonRegistry::new())
            .with_style(Theme::default(), ASCII_SYMBOLS);
        app.resize(width, height);
        app
    }

    fn draw(app: &App, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| render(f, app))
            .expect("Drawing should not fail");
        terminal.backend().buffer().clone()
    }

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(TuiEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn dashboard_shows_header_cards_and_hints() {
        let app = create_app(80, 40);

        let text = buffer_text(&draw(&app, 80, 40));

        assert!(text.contains("JobDeck"));
        assert!(text.contains("6 of 8 widgets shown"));
        assert!(text.contains("Overall Progress"));
        assert!(text.contains("customize"));
        assert!(!text.contains("Streaks"));
    }

    #[test]
    fn customize_overlay_lists_hidden_widgets() {
        let mut app = create_app(80, 40);
        press(&mut app, KeyCode::Char('c'));

        let text = buffer_text(&draw(&app, 80, 40));

        assert!(text.contains("Customize dashboard"));
        assert!(text.contains("Streaks"));
    }

    #[test]
    fn reset_request_shows_confirmation() {
        let mut app = create_app(80, 40);
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Char('r'));

        let text = buffer_text(&draw(&app, 80, 40));

        assert!(text.contains(RESET_TITLE));
        assert!(text.contains(RESET_MESSAGE));
    }

    #[test]
    fn bubble_draws_above_dashboard() {
        let mut app = create_app(80, 40);
        press(&mut app, KeyCode::Char('a'));
        assert!(app.bubble.is_some());

        let text = buffer_text(&draw(&app, 80, 40));

        assert!(text.contains("Assistant"));
    }

    #[test]
    fn hiding_everything_shows_empty_state() {
        let mut app = create_app(80, 30);
        let ids: Vec<String> = app.layout.widgets().iter().map(|w| w.id.clone()).collect();
        for id in ids {
            app.layout.update_widget_visibility(&id, false).unwrap();
        }
        app.refresh_from_stores();

        let text = buffer_text(&draw(&app, 80, 30));

        assert!(text.contains("0 of 8 widgets shown"));
        assert!(text.contains("No widgets are visible."));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut app = create_app(10, 4);
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Char('r'));
        draw(&app, 10, 4);
    }

    #[test]
    fn monochrome_theme_renders() {
        let app = create_app(100, 50);
        let app = app.with_style(Theme::monochrome(), ASCII_SYMBOLS);
        let text = buffer_text(&draw(&app, 100, 50));
        assert!(text.contains("Quick Stats"));
    }
}
