use ratatui::{
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::components::preview::PreviewOverlay;
use crate::components::status_bar::StatusBar;
use crate::components::tree::TreeWidget;
use crate::remote::client::RemoteFs;
use crate::sync::MoveGesture;
use crate::theme::ThemeColors;

/// Render the application UI.
pub fn render<R: RemoteFs>(app: &mut App<R>, frame: &mut Frame, theme: &ThemeColors, use_icons: bool) {
    let area = frame.area();

    // Root-load failure: permanent error screen, nothing else to draw.
    if let Some(error) = &app.fatal_error {
        let block = Block::default()
            .title(" remote files ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error_fg));
        let lines = vec![
            Line::from(""),
            Line::styled(
                "Could not load the remote file tree",
                Style::default()
                    .fg(theme.error_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::from(""),
            Line::styled(error.as_str(), Style::default().fg(theme.tree_fg)),
            Line::from(""),
            Line::styled("press q to quit", Style::default().fg(theme.dim_fg)),
        ];
        frame.render_widget(
            Paragraph::new(lines).centered().block(block),
            area,
        );
        return;
    }

    let [tree_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    // Keep the selected row inside the viewport (borders take two rows).
    let visible_height = tree_area.height.saturating_sub(2) as usize;
    app.update_scroll(visible_height);

    let block = Block::default()
        .title(" remote files ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_fg));

    let staged = match &app.move_gesture {
        MoveGesture::AwaitingDestination { source } => Some(source.as_str()),
        _ => None,
    };

    let tree = TreeWidget::new(
        &app.flat_items,
        app.selected_index,
        app.scroll_offset,
        theme,
        use_icons,
    )
    .staged_source(staged)
    .block(block);
    frame.render_widget(tree, tree_area);

    let status = StatusBar::new(
        app.status_message.as_ref().map(|(m, _)| m.as_str()),
        &app.move_gesture,
        app.selected().map(|i| i.path.as_str()),
        theme,
    );
    frame.render_widget(status, status_area);

    if let Some(preview) = &app.preview {
        frame.render_widget(PreviewOverlay::new(preview, theme), area);
    }
}
