//! Header bar for the JobDeck TUI.
//!
//! ```text
//! ┌ JobDeck ───────────────────────────────────────────┐
//! │ • alice                        6 of 8 widgets shown │
//! └─────────────────────────────────────────────────────┘
//! ```

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::tui::app::{Symbols, Theme};

/// Height of the header in rows (two borders and one content line).
pub const HEADER_HEIGHT: u16 = 3;

/// Title shown in the header border.
const TITLE: &str = " JobDeck ";

/// Widget for the top header bar.
#[derive(Debug)]
pub struct HeaderWidget<'a> {
    user_id: &'a str,
    visible: usize,
    total: usize,
    theme: &'a Theme,
    symbols: &'a Symbols,
}

impl<'a> HeaderWidget<'a> {
    /// Creates a new `HeaderWidget`.
    #[must_use]
    pub fn new(
        user_id: &'a str,
        visible: usize,
        total: usize,
        theme: &'a Theme,
        symbols: &'a Symbols,
    ) -> Self {
        Self {
            user_id,
            visible,
            total,
            theme,
            symbols,
        }
    }
}

impl Widget for HeaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title(Span::styled(TITLE, self.theme.title));
        let inner = block.inner(area);
        block.render(area, buf);

        let user = Line::from(vec![
            Span::styled(self.symbols.bullet, self.theme.text_muted),
            Span::raw(" "),
            Span::styled(self.user_id, self.theme.text_primary),
        ]);
        Paragraph::new(user).render(inner, buf);

        let count = Line::styled(
            format!("{} of {} widgets shown", self.visible, self.total),
            self.theme.text_secondary,
        );
        Paragraph::new(count)
            .alignment(Alignment::Right)
            .render(inner, buf);
    }
}
