//! Blocking yes/no confirmation dialog.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::tui::app::Theme;
use crate::tui::widgets::centered_rect;

/// Dialog width in columns.
const DIALOG_WIDTH: u16 = 46;

/// Dialog height in rows.
const DIALOG_HEIGHT: u16 = 7;

/// Returns the dialog area centered in `screen`.
#[must_use]
pub fn dialog_area(screen: Rect) -> Rect {
    centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, screen)
}

/// Widget drawing a confirmation prompt over whatever is below it.
#[derive(Debug)]
pub struct ConfirmDialogWidget<'a> {
    title: &'a str,
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> ConfirmDialogWidget<'a> {
    /// Creates a new `ConfirmDialogWidget`.
    #[must_use]
    pub fn new(title: &'a str, message: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            message,
            theme,
        }
    }
}

impl Widget for ConfirmDialogWidget<'_> {
    /// Renders centered in `area`.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog = dialog_area(area);
        if dialog.width < 3 || dialog.height < 3 {
            return;
        }
        Clear.render(dialog, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.danger)
            .title(Span::styled(format!(" {} ", self.title), self.theme.danger));
        let inner = block.inner(dialog);
        block.render(dialog, buf);

        let text = vec![
            Line::styled(self.message, self.theme.text_primary),
            Line::from(""),
            Line::from(vec![
                Span::styled("[y]", self.theme.key),
                Span::styled(" Yes   ", self.theme.text_secondary),
                Span::styled("[n]", self.theme.key),
                Span::styled(" No", self.theme.text_secondary),
            ]),
        ];
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn renders_title_message_and_choices() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);

        ConfirmDialogWidget::new("Reset layout", "Restore the default widgets?", &theme)
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Reset layout"));
        assert!(text.contains("Restore the default widgets?"));
        assert!(text.contains("[y] Yes"));
    }

    #[test]
    fn dialog_is_centered() {
        assert_eq!(dialog_area(Rect::new(0, 0, 80, 24)), Rect::new(17, 8, 46, 7));
    }

    #[test]
    fn tiny_area_is_skipped() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);

        ConfirmDialogWidget::new("Reset", "Sure?", &theme).render(area, &mut buf);
    }
}
