//! A single dashboard card.
//!
//! ```text
//! ┌◎ Overall Progress─────────────────────[L]┐
//! │65% résumé complete                        │
//! │█████████████████65%░░░░░░░░░░░░░░░░░░░░░░│
//! │• 3 applications this week                 │
//! └───────────────────────────────────────────┘
//! ```
//!
//! The card's height is the definition's `min_height` times the size
//! multiplier, plus the two border rows. Content that does not fit is cut
//! from the bottom.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::registry::{WidgetContent, WidgetDefinition};
use crate::tui::app::{Symbols, Theme};
use crate::types::{UserMetrics, WidgetInstance, WidgetSize};

/// Rows taken by the top and bottom borders.
pub const CARD_BORDER_ROWS: u16 = 2;

/// Returns the full card height, borders included.
///
/// # Example
///
/// ```
/// use jobdeck_dashboard::registry::WidgetRegistry;
/// use jobdeck_dashboard::tui::widgets::card_height;
/// use jobdeck_dashboard::types::WidgetSize;
///
/// let registry = WidgetRegistry::builtin();
/// let progress = registry.get_widget_by_id("overallProgress").unwrap();
/// assert_eq!(card_height(progress, WidgetSize::L), 2 * 3 + 2);
/// ```
#[must_use]
pub fn card_height(definition: &WidgetDefinition, size: WidgetSize) -> u16 {
    definition
        .min_height
        .saturating_mul(size.height_multiplier())
        .saturating_add(CARD_BORDER_ROWS)
}

/// Widget drawing one [`WidgetInstance`] with its definition's content.
#[derive(Debug)]
pub struct WidgetCardWidget<'a> {
    definition: &'a WidgetDefinition,
    instance: &'a WidgetInstance,
    content: WidgetContent,
    theme: &'a Theme,
    symbols: &'a Symbols,
}

impl<'a> WidgetCardWidget<'a> {
    /// Creates a card, rendering the content from `metrics`.
    #[must_use]
    pub fn new(
        definition: &'a WidgetDefinition,
        instance: &'a WidgetInstance,
        metrics: &UserMetrics,
        theme: &'a Theme,
        symbols: &'a Symbols,
    ) -> Self {
        Self {
            definition,
            instance,
            content: definition.render_content(metrics, instance.size),
            theme,
            symbols,
        }
    }

    fn block(&self) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title(Line::from(vec![
                Span::styled(self.definition.icon, self.theme.card_title),
                Span::raw(" "),
                Span::styled(self.definition.title, self.theme.card_title),
            ]))
            .title(
                Line::from(Span::styled(
                    format!("[{}]", self.instance.size),
                    self.theme.size_badge,
                ))
                .right_aligned(),
            )
    }
}

impl Widget for WidgetCardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);

        let mut row = inner.y;
        let bottom = inner.bottom();

        if row < bottom {
            Paragraph::new(Line::styled(
                self.content.headline.as_str(),
                self.theme.card_headline,
            ))
            .render(Rect::new(inner.x, row, inner.width, 1), buf);
            row += 1;
        }

        if let Some(percent) = self.content.progress {
            if row < bottom {
                let percent = percent.min(100);
                Gauge::default()
                    .gauge_style(self.theme.gauge)
                    .percent(percent)
                    .label(format!("{percent}%"))
                    .render(Rect::new(inner.x, row, inner.width, 1), buf);
                row += 1;
            }
        }

        for detail in &self.content.details {
            if row >= bottom {
                break;
            }
            Paragraph::new(Line::from(vec![
                Span::styled(self.symbols.bullet, self.theme.text_muted),
                Span::raw(" "),
                Span::styled(detail.as_str(), self.theme.text_secondary),
            ]))
            .render(Rect::new(inner.x, row, inner.width, 1), buf);
            row += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::WidgetRegistry;
    use crate::tui::app::ASCII_SYMBOLS;

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

    fn metrics() -> UserMetrics {
        UserMetrics {
            resume_progress: 65,
            applications_week: 3,
            interviews_upcoming: 1,
            deadlines_48h: 2,
            streak_days: 4,
        }
    }

    #[test]
    fn card_height_scales_with_size() {
        let registry = WidgetRegistry::builtin();
        let stats = registry.get_widget_by_id("quickStats").unwrap();

        assert_eq!(card_height(stats, WidgetSize::S), 3);
        assert_eq!(card_height(stats, WidgetSize::M), 4);
        assert_eq!(card_height(stats, WidgetSize::L), 5);
    }

    #[test]
    fn renders_title_and_size_badge() {
        let registry = WidgetRegistry::builtin();
        let definition = registry.get_widget_by_id("overallProgress").unwrap();
        let instance = WidgetInstance::new("overallProgress", WidgetSize::L, true, 0);
        let theme = Theme::default();

        let area = Rect::new(0, 0, 50, card_height(definition, WidgetSize::L));
        let mut buf = Buffer::empty(area);
        WidgetCardWidget::new(definition, &instance, &metrics(), &theme, &ASCII_SYMBOLS)
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Overall Progress"));
        assert!(text.contains("[L]"));
        assert!(text.contains("65%"));
    }

    #[test]
    fn handles_zero_area() {
        let registry = WidgetRegistry::builtin();
        let definition = registry.get_widget_by_id("streaks").unwrap();
        let instance = WidgetInstance::new("streaks", WidgetSize::S, true, 0);
        let theme = Theme::default();

        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        WidgetCardWidget::new(definition, &instance, &metrics(), &theme, &ASCII_SYMBOLS)
            .render(area, &mut buf);
    }

    #[test]
    fn content_is_cut_to_fit() {
        let registry = WidgetRegistry::builtin();
        let definition = registry.get_widget_by_id("nextActions").unwrap();
        let instance = WidgetInstance::new("nextActions", WidgetSize::L, true, 0);
        let theme = Theme::default();

        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        WidgetCardWidget::new(definition, &instance, &metrics(), &theme, &ASCII_SYMBOLS)
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Next Actions"));
    }
}
