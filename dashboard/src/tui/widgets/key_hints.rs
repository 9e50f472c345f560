//! Keybinding footer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::app::Theme;

/// Height of the footer in rows.
pub const KEY_HINTS_HEIGHT: u16 = 1;

/// Gap between hints.
const SEPARATOR: &str = "  ";

/// Widget listing `(key, action)` pairs, or a status message when one is set.
#[derive(Debug)]
pub struct KeyHintsWidget<'a> {
    hints: &'a [(&'a str, &'a str)],
    status: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> KeyHintsWidget<'a> {
    /// Creates a new `KeyHintsWidget`.
    #[must_use]
    pub fn new(hints: &'a [(&'a str, &'a str)], status: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            hints,
            status,
            theme,
        }
    }

    fn line(&self) -> Line<'a> {
        if let Some(status) = self.status {
            return Line::styled(status, self.theme.danger);
        }

        let mut spans = Vec::with_capacity(self.hints.len() * 3);
        for (idx, (key, action)) in self.hints.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw(SEPARATOR));
            }
            spans.push(Span::styled(*key, self.theme.key));
            spans.push(Span::styled(format!(" {action}"), self.theme.text_secondary));
        }
        Line::from(spans)
    }
}

impl Widget for KeyHintsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        Paragraph::new(self.line()).render(area, buf);
    }
}
