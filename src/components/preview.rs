use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::app::FilePreview;
use crate::theme::ThemeColors;

/// Centered overlay showing the raw text of an opened remote file.
pub struct PreviewOverlay<'a> {
    preview: &'a FilePreview,
    theme: &'a ThemeColors,
}

impl<'a> PreviewOverlay<'a> {
    pub fn new(preview: &'a FilePreview, theme: &'a ThemeColors) -> Self {
        Self { preview, theme }
    }

    /// Centered rect taking most of the surrounding area.
    fn centered(area: Rect) -> Rect {
        let margin_x = area.width / 8;
        let margin_y = area.height / 8;
        Rect {
            x: area.x + margin_x,
            y: area.y + margin_y,
            width: area.width.saturating_sub(margin_x * 2),
            height: area.height.saturating_sub(margin_y * 2),
        }
    }
}

impl<'a> Widget for PreviewOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let overlay = Self::centered(area);
        Clear.render(overlay, buf);

        let block = Block::default()
            .title(format!(" {} ", self.preview.path))
            .title_bottom(" any key to close ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_fg));

        Paragraph::new(self.preview.contents.as_str())
            .style(Style::default().fg(self.theme.tree_fg))
            .wrap(Wrap { trim: false })
            .block(block)
            .render(overlay, buf);
    }
}
