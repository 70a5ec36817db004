use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::sync::MoveGesture;
use crate::theme::ThemeColors;

const KEY_HELP: &str = "↑↓ navigate · ⏎ open/expand · m move · q quit";

/// One-line status bar: transient messages and move-gesture prompts on the
/// left, the selected path on the right.
pub struct StatusBar<'a> {
    message: Option<&'a str>,
    gesture: &'a MoveGesture,
    selected_path: Option<&'a str>,
    theme: &'a ThemeColors,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        message: Option<&'a str>,
        gesture: &'a MoveGesture,
        selected_path: Option<&'a str>,
        theme: &'a ThemeColors,
    ) -> Self {
        Self {
            message,
            gesture,
            selected_path,
            theme,
        }
    }

    fn left_text(&self) -> String {
        if let Some(msg) = self.message {
            return msg.to_string();
        }
        match self.gesture {
            MoveGesture::Armed => "Move: select the entry to move".to_string(),
            MoveGesture::AwaitingDestination { source } => {
                format!("Moving {} — select a destination directory", source)
            }
            MoveGesture::Idle => KEY_HELP.to_string(),
        }
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let base = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        buf.set_style(area, base);

        let left = self.left_text();
        let left_style = if self.gesture.is_active() {
            base.fg(self.theme.accent_fg)
        } else {
            base
        };

        let right = self.selected_path.unwrap_or("");
        let width = area.width as usize;
        let left_width = left.chars().count();
        let right_width = right.chars().count();

        let spans = if right_width > 0 && left_width + right_width + 2 <= width {
            let pad = width - left_width - right_width;
            vec![
                Span::styled(left, left_style),
                Span::raw(" ".repeat(pad)),
                Span::styled(right.to_string(), base.fg(self.theme.dim_fg)),
            ]
        } else {
            vec![Span::styled(left, left_style)]
        };

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
