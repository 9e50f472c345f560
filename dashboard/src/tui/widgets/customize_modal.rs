//! Customization modal.
//!
//! ```text
//! ┌ Customize dashboard ──────────────────────────────┐
//! │ Show, hide, resize and drag widgets into place.   │
//! │                                                   │
//! │ :: [x] Overall Progress                       [L] │
//! │ :: [x] Quick Stats                            [M] │
//! │ :: [ ] Streaks                                [S] │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! Geometry is exposed through [`modal_area`] and [`list_area`] so mouse
//! handling can map pointer rows to list indexes with the same layout the
//! renderer uses. Each list row is one terminal row.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::layout::LayoutStore;
use crate::tui::app::{Symbols, Theme};
use crate::tui::customize::{CustomizeModal, ModalMode};
use crate::tui::widgets::centered_rect;
use crate::types::WidgetInstance;

/// Preferred modal width in columns.
const MODAL_WIDTH: u16 = 64;

/// Rows used by borders, the description line and the spacer.
const MODAL_CHROME_ROWS: u16 = 5;

/// Rows above the list inside the modal (border, description, spacer).
const LIST_TOP_OFFSET: u16 = 3;

/// Returns the modal area for a list of `rows` entries, centered in `screen`.
#[must_use]
pub fn modal_area(screen: Rect, rows: usize) -> Rect {
    let rows = u16::try_from(rows).unwrap_or(u16::MAX);
    centered_rect(MODAL_WIDTH, rows.saturating_add(MODAL_CHROME_ROWS), screen)
}

/// Returns the list area inside a modal.
#[must_use]
pub fn list_area(modal: Rect) -> Rect {
    Rect::new(
        modal.x.saturating_add(2),
        modal.y.saturating_add(LIST_TOP_OFFSET),
        modal.width.saturating_sub(4),
        modal.height.saturating_sub(LIST_TOP_OFFSET + 1),
    )
}

/// Widget drawing the customization modal centered in the given area.
#[derive(Debug)]
pub struct CustomizeModalWidget<'a> {
    modal: &'a CustomizeModal,
    store: &'a LayoutStore,
    theme: &'a Theme,
    symbols: &'a Symbols,
}

impl<'a> CustomizeModalWidget<'a> {
    /// Creates a new `CustomizeModalWidget`.
    #[must_use]
    pub fn new(
        modal: &'a CustomizeModal,
        store: &'a LayoutStore,
        theme: &'a Theme,
        symbols: &'a Symbols,
    ) -> Self {
        Self {
            modal,
            store,
            theme,
            symbols,
        }
    }

    fn layout_row(&self, idx: usize, item: &WidgetInstance, width: u16) -> Line<'a> {
        let title = self
            .store
            .registry()
            .get_widget_by_id(&item.id)
            .map_or_else(|| item.id.clone(), |d| d.title.to_string());
        let marker = if item.visible {
            self.symbols.visible
        } else {
            self.symbols.hidden
        };

        let style = match self.modal.drag() {
            Some(drag) if drag.to == idx => self.theme.drag,
            Some(_) => self.row_base_style(item),
            None if self.modal.selected() == idx => self.theme.selection,
            None => self.row_base_style(item),
        };

        let left = format!("{} {} {}", self.symbols.drag_handle, marker, title);
        let badge = format!("[{}]", item.size);
        let pad = usize::from(width)
            .saturating_sub(left.chars().count() + badge.len())
            .max(1);

        Line::from(vec![
            Span::styled(left, style),
            Span::styled(" ".repeat(pad), style),
            Span::styled(badge, style.patch(self.badge_style(style))),
        ])
    }

    fn row_base_style(&self, item: &WidgetInstance) -> Style {
        if item.visible {
            self.theme.text_primary
        } else {
            self.theme.hidden
        }
    }

    fn badge_style(&self, row_style: Style) -> Style {
        if row_style == self.theme.selection || row_style == self.theme.drag {
            Style::default()
        } else {
            self.theme.size_badge
        }
    }

    fn browse_lines(&self, width: u16) -> Vec<Line<'a>> {
        self.modal
            .preview_items()
            .into_iter()
            .enumerate()
            .map(|(idx, item)| self.layout_row(idx, item, width))
            .collect()
    }

    fn adding_lines(&self, selected: usize) -> Vec<Line<'a>> {
        let addable = self.modal.addable_widgets(self.store);
        if addable.is_empty() {
            return vec![Line::styled(
                "Every available widget is already on your dashboard.",
                self.theme.text_muted,
            )];
        }
        addable
            .iter()
            .enumerate()
            .map(|(idx, definition)| {
                let style = if idx == selected {
                    self.theme.selection
                } else {
                    self.theme.text_primary
                };
                Line::from(vec![
                    Span::styled(format!("{} {}", definition.icon, definition.title), style),
                    Span::styled(format!("  {}", definition.description), self.theme.text_muted),
                ])
            })
            .collect()
    }
}

impl Widget for CustomizeModalWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, description, rows) = match self.modal.mode() {
            ModalMode::Adding { .. } => (
                " Add a widget ",
                "Pick a widget to show on your dashboard.",
                self.modal.addable_widgets(self.store).len().max(1),
            ),
            _ => (
                " Customize dashboard ",
                "Show, hide, resize and drag widgets into place.",
                self.modal.items().len(),
            ),
        };

        let modal = modal_area(area, rows);
        if modal.width < 6 || modal.height < MODAL_CHROME_ROWS {
            return;
        }
        Clear.render(modal, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_focused)
            .title(Span::styled(title, self.theme.title));
        let inner = block.inner(modal);
        block.render(modal, buf);

        Paragraph::new(Line::styled(description, self.theme.text_secondary))
            .render(Rect::new(inner.x + 1, inner.y, inner.width.saturating_sub(2), 1), buf);

        let list = list_area(modal);
        let lines = match self.modal.mode() {
            ModalMode::Adding { selected } => self.adding_lines(selected),
            _ => self.browse_lines(list.width),
        };
        Paragraph::new(lines).render(list, buf);
    }
}
