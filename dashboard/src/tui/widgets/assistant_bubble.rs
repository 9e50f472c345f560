//! Floating assistant placeholder.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::tui::app::{Symbols, Theme};

/// Widget drawing the assistant bubble into the area it is given.
#[derive(Debug)]
pub struct AssistantBubbleWidget<'a> {
    theme: &'a Theme,
    symbols: &'a Symbols,
}

impl<'a> AssistantBubbleWidget<'a> {
    /// Creates a new `AssistantBubbleWidget`.
    #[must_use]
    pub fn new(theme: &'a Theme, symbols: &'a Symbols) -> Self {
        Self { theme, symbols }
    }
}

impl Widget for AssistantBubbleWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 3 {
            return;
        }
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.bubble)
            .title(Span::styled(" Assistant ", self.theme.bubble));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(vec![
            Line::styled("Need a hand with your search?", self.theme.text_primary),
            Line::from(vec![
                Span::styled(self.symbols.arrow, self.theme.text_muted),
                Span::styled(" drag me anywhere", self.theme.text_muted),
            ]),
        ])
        .render(inner, buf);
    }
}
