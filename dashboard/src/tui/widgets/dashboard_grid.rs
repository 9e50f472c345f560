//! Stacked card layout for the dashboard screen.
//!
//! Cards are laid out top to bottom in render order, starting at the scroll
//! offset. A card is only drawn if it fits completely; when cards remain
//! below the fold, the last row shows a "more below" hint instead.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::registry::WidgetDefinition;
use crate::tui::app::{Symbols, Theme};
use crate::tui::widgets::widget_card::{card_height, WidgetCardWidget};
use crate::types::{UserMetrics, WidgetInstance};

/// Where one card lands inside the grid area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPlacement {
    /// Index into the card list.
    pub index: usize,
    /// Row offset from the top of the grid area.
    pub offset: u16,
    /// Card height.
    pub height: u16,
}

/// Places cards of the given heights into `available` rows, starting at `scroll`.
///
/// Returns the placements and how many cards did not fit. When some do not
/// fit, one row is kept free for the hint.
///
/// # Example
///
/// ```
/// use jobdeck_dashboard::tui::widgets::plan_cards;
///
/// let (placed, hidden) = plan_cards(&[4, 4, 4], 0, 10);
/// assert_eq!(placed.len(), 2);
/// assert_eq!(hidden, 1);
/// ```
#[must_use]
pub fn plan_cards(heights: &[u16], scroll: usize, available: u16) -> (Vec<CardPlacement>, usize) {
    let fit = |budget: u16| {
        let mut placed = Vec::new();
        let mut offset: u16 = 0;
        for (index, &height) in heights.iter().enumerate().skip(scroll) {
            if offset.saturating_add(height) > budget {
                break;
            }
            placed.push(CardPlacement {
                index,
                offset,
                height,
            });
            offset += height;
        }
        placed
    };

    let remaining = heights.len().saturating_sub(scroll);
    let placed = fit(available);
    if placed.len() == remaining {
        return (placed, 0);
    }

    let placed = fit(available.saturating_sub(1));
    let hidden = remaining - placed.len();
    (placed, hidden)
}

/// Widget drawing the visible widgets as stacked cards.
#[derive(Debug)]
pub struct DashboardGridWidget<'a> {
    cards: Vec<(&'a WidgetDefinition, &'a WidgetInstance)>,
    metrics: &'a UserMetrics,
    scroll: usize,
    theme: &'a Theme,
    symbols: &'a Symbols,
}

impl<'a> DashboardGridWidget<'a> {
    /// Creates the grid. `cards` must already be in render order.
    #[must_use]
    pub fn new(
        cards: Vec<(&'a WidgetDefinition, &'a WidgetInstance)>,
        metrics: &'a UserMetrics,
        scroll: usize,
        theme: &'a Theme,
        symbols: &'a Symbols,
    ) -> Self {
        Self {
            cards,
            metrics,
            scroll,
            theme,
            symbols,
        }
    }

    fn render_empty(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(vec![
            Line::from(""),
            Line::styled("No widgets are visible.", self.theme.text_secondary),
            Line::from(vec![
                Span::styled("Press ", self.theme.text_muted),
                Span::styled("c", self.theme.key),
                Span::styled(" to customize your dashboard.", self.theme.text_muted),
            ]),
        ])
        .alignment(Alignment::Center)
        .render(area, buf);
    }
}

impl Widget for DashboardGridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.cards.is_empty() {
            self.render_empty(area, buf);
            return;
        }

        let heights: Vec<u16> = self
            .cards
            .iter()
            .map(|(definition, instance)| card_height(definition, instance.size))
            .collect();
        let (placements, hidden) = plan_cards(&heights, self.scroll, area.height);

        for placement in placements {
            let (definition, instance) = self.cards[placement.index];
            let card_area = Rect::new(
                area.x,
                area.y + placement.offset,
                area.width,
                placement.height,
            );
            WidgetCardWidget::new(definition, instance, self.metrics, self.theme, self.symbols)
                .render(card_area, buf);
        }

        if hidden > 0 {
            let hint = Line::from(vec![
                Span::styled(self.symbols.more_below, self.theme.text_muted),
                Span::styled(format!(" {hidden} more below"), self.theme.text_muted),
            ]);
            Paragraph::new(hint)
                .alignment(Alignment::Center)
                .render(Rect::new(area.x, area.bottom() - 1, area.width, 1), buf);
        }
    }
}
