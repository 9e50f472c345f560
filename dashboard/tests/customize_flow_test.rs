//! End-to-end tests for the customization flow.
//!
//! These drive [`App`] with the same key and mouse events the terminal
//! produces and check what lands in storage, without a real terminal.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tempfile::TempDir;

use jobdeck_dashboard::layout::LayoutStore;
use jobdeck_dashboard::metrics::MetricsStore;
use jobdeck_dashboard::registry::{WidgetRegistry, TRANSLATOR_FLAG};
use jobdeck_dashboard::singleton::SingletonRegistry;
use jobdeck_dashboard::storage::{FileStorage, KeyValueStorage};
use jobdeck_dashboard::tui::widgets::customize_modal::{list_area, modal_area};
use jobdeck_dashboard::tui::{App, ModalMode, Screen, TuiEvent};
use jobdeck_dashboard::types::MetricsUpdate;

// =============================================================================
// Helpers
// =============================================================================

const USER: &str = "alice";

fn open_app(dir: &TempDir, flags: Vec<String>, singletons: SingletonRegistry) -> App {
    let storage: Arc<dyn KeyValueStorage> =
        Arc::new(FileStorage::open(dir.path()).expect("Failed to open storage"));
    let mut layout = LayoutStore::new(storage.clone(), Arc::new(WidgetRegistry::builtin()));
    layout.load(USER);
    let mut metrics = MetricsStore::new(storage);
    metrics.load(USER);

    let mut app = App::new(layout, metrics, flags, singletons);
    app.resize(80, 30);
    app
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_event(TuiEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
}

fn press_n(app: &mut App, code: KeyCode, times: usize) {
    for _ in 0..times {
        press(app, code);
    }
}

fn mouse(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
    app.handle_event(TuiEvent::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }));
}

fn visible_ids(app: &App) -> Vec<&str> {
    app.visible_widgets().iter().map(|w| w.id.as_str()).collect()
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn showing_a_hidden_widget_appends_it_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = open_app(&dir, Vec::new(), SingletonRegistry::new());

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.screen, Screen::Customize);
    press_n(&mut app, KeyCode::Down, 7);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.screen, Screen::Dashboard);
    assert_eq!(visible_ids(&app).len(), 7);
    assert_eq!(visible_ids(&app).last(), Some(&"streaks"));

    let reopened = open_app(&dir, Vec::new(), SingletonRegistry::new());
    assert_eq!(visible_ids(&reopened).last(), Some(&"streaks"));
}

#[test]
fn keyboard_drag_moves_widget_down() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = open_app(&dir, Vec::new(), SingletonRegistry::new());

    press(&mut app, KeyCode::Char('c'));
    press(&mut app, KeyCode::Char(' '));
    press_n(&mut app, KeyCode::Down, 2);
    press(&mut app, KeyCode::Char(' '));

    assert_eq!(
        &visible_ids(&app)[..3],
        ["quickStats", "nextActions", "overallProgress"]
    );
    assert_eq!(app.layout.widgets()[2].order, 2);
}

#[test]
fn cancelled_drag_leaves_layout_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = open_app(&dir, Vec::new(), SingletonRegistry::new());
    let before = app.layout.widgets().to_vec();

    press(&mut app, KeyCode::Char('c'));
    press(&mut app, KeyCode::Char(' '));
    press_n(&mut app, KeyCode::Down, 4);
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.layout.widgets(), before.as_slice());
    assert_eq!(app.screen, Screen::Customize);
}

#[test]
fn mouse_drag_drops_on_pointer_row() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = open_app(&dir, Vec::new(), SingletonRegistry::new());
    press(&mut app, KeyCode::Char('c'));

    let list = list_area(modal_area(app.viewport, app.layout.widgets().len()));
    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), list.x + 1, list.y + 1);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), list.x + 1, list.y + 4);
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), list.x + 1, list.y + 4);

    let ids: Vec<&str> = app.layout.widgets().iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids[4], "quickStats");
    assert_eq!(ids[1], "nextActions");
}

#[test]
fn add_picker_respects_feature_flags() {
    let dir = tempfile::tempdir().unwrap();

    let mut plain = open_app(&dir, Vec::new(), SingletonRegistry::new());
    press(&mut plain, KeyCode::Char('c'));
    press(&mut plain, KeyCode::Char('a'));
    let addable: Vec<&str> = plain
        .customize
        .as_ref()
        .unwrap()
        .addable_widgets(&plain.layout)
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(addable, ["streaks"]);

    let mut flagged = open_app(&dir, vec![TRANSLATOR_FLAG.to_string()], SingletonRegistry::new());
    press(&mut flagged, KeyCode::Char('c'));
    press(&mut flagged, KeyCode::Char('a'));
    press(&mut flagged, KeyCode::Enter);

    assert!(flagged.layout.widget("translatorShortcut").unwrap().visible);
    assert_eq!(
        flagged.customize.as_ref().unwrap().mode(),
        ModalMode::Browse
    );
}

#[test]
fn reset_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = open_app(&dir, Vec::new(), SingletonRegistry::new());
    app.layout.remove_widget("overallProgress").unwrap();

    press(&mut app, KeyCode::Char('c'));
    press(&mut app, KeyCode::Char('r'));
    press(&mut app, KeyCode::Char('n'));
    assert!(!app.layout.widget("overallProgress").unwrap().visible);

    press(&mut app, KeyCode::Char('r'));
    press(&mut app, KeyCode::Char('y'));
    assert!(app.layout.widget("overallProgress").unwrap().visible);
    assert_eq!(visible_ids(&app)[0], "overallProgress");
}

#[test]
fn metrics_changes_reach_the_dashboard_on_tick() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = open_app(&dir, Vec::new(), SingletonRegistry::new());
    app.take_dirty();

    app.metrics
        .update_metrics(MetricsUpdate {
            streak_days: Some(12),
            ..Default::default()
        })
        .unwrap();
    app.handle_event(TuiEvent::Tick);

    assert_eq!(app.current_metrics().streak_days, 12);
    assert!(app.take_dirty());
}

#[test]
fn assistant_bubble_is_single_instance_across_apps() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let singletons = SingletonRegistry::new();
    let mut first = open_app(&dir_a, Vec::new(), singletons.clone());
    let mut second = open_app(&dir_b, Vec::new(), singletons);

    press(&mut first, KeyCode::Char('a'));
    press(&mut second, KeyCode::Char('a'));
    assert!(first.bubble.is_some());
    assert!(second.bubble.is_none());
    assert!(second.status.is_some());

    press(&mut first, KeyCode::Char('a'));
    press(&mut second, KeyCode::Char('a'));
    assert!(first.bubble.is_none());
    assert!(second.bubble.is_some());
}
