//! Reusable TUI widget components for the JobDeck dashboard.
//!
//! Each widget borrows what it draws and implements ratatui's [`Widget`]
//! trait; all state lives in the [`App`](crate::tui::App).
//!
//! # Widget Catalog
//!
//! ## Dashboard
//! - [`header`]: title bar with user and visible-widget count
//! - [`widget_card`]: one bordered card rendering a widget's content
//! - [`dashboard_grid`]: stacked cards with scrolling and a "more below" hint
//!
//! ## Overlays
//! - [`customize_modal`]: layout editor with drag-and-drop and the add picker
//! - [`confirm_dialog`]: blocking yes/no confirmation
//! - [`assistant_bubble`]: the floating assistant placeholder
//!
//! ## Chrome
//! - [`key_hints`]: context-sensitive keybinding footer
//!
//! [`Widget`]: ratatui::widgets::Widget

use ratatui::layout::Rect;

pub mod assistant_bubble;
pub mod confirm_dialog;
pub mod customize_modal;
pub mod dashboard_grid;
pub mod header;
pub mod key_hints;
pub mod widget_card;

pub use assistant_bubble::AssistantBubbleWidget;
pub use confirm_dialog::ConfirmDialogWidget;
pub use customize_modal::CustomizeModalWidget;
pub use dashboard_grid::{plan_cards, CardPlacement, DashboardGridWidget};
pub use header::{HeaderWidget, HEADER_HEIGHT};
pub use key_hints::{KeyHintsWidget, KEY_HINTS_HEIGHT};
pub use widget_card::{card_height, WidgetCardWidget};

/// Returns a `width` x `height` rect centered in `area`, shrunk to fit.
#[must_use]
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
