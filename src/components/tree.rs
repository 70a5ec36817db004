use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::FlatItem;
use crate::model::tree::LoadState;
use crate::remote::protocol::EntryKind;
use crate::theme::ThemeColors;

/// Tree widget that renders the remote file tree with box-drawing characters.
pub struct TreeWidget<'a> {
    items: &'a [FlatItem],
    selected_index: usize,
    scroll_offset: usize,
    /// Path staged as the move source, highlighted while the gesture is live.
    staged_source: Option<&'a str>,
    theme: &'a ThemeColors,
    use_icons: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(
        items: &'a [FlatItem],
        selected_index: usize,
        scroll_offset: usize,
        theme: &'a ThemeColors,
        use_icons: bool,
    ) -> Self {
        Self {
            items,
            selected_index,
            scroll_offset,
            staged_source: None,
            theme,
            use_icons,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    pub fn staged_source(mut self, source: Option<&'a str>) -> Self {
        self.staged_source = source;
        self
    }

    /// Build the prefix string for tree indentation using box-drawing characters.
    ///
    /// We need to know the ancestor chain to draw continuation lines correctly.
    fn build_prefix(item: &FlatItem, items: &[FlatItem], item_index: usize) -> String {
        if item.depth == 0 {
            return if item.is_last_sibling {
                "└──".to_string()
            } else {
                "├──".to_string()
            };
        }

        let mut parts: Vec<&str> = Vec::new();

        // For each ancestor level, check whether its subtree continues below
        // so we know to draw a vertical bar or a gap.
        for d in 0..item.depth {
            let mut ancestor_is_last = false;
            for j in (0..item_index).rev() {
                if items[j].depth == d {
                    ancestor_is_last = items[j].is_last_sibling;
                    break;
                }
                if items[j].depth < d {
                    break;
                }
            }
            if ancestor_is_last {
                parts.push("   ");
            } else {
                parts.push("│  ");
            }
        }

        if item.is_last_sibling {
            parts.push("└──");
        } else {
            parts.push("├──");
        }

        parts.join("")
    }

    /// Disclosure marker driven by the directory's confirmed load state.
    fn disclosure(item: &FlatItem) -> &'static str {
        match item.kind {
            EntryKind::Directory => match item.load_state {
                LoadState::Unloaded => "▸ ",
                LoadState::Loading => "⋯ ",
                LoadState::Loaded => "▾ ",
            },
            EntryKind::File => "  ",
        }
    }

    /// Map the entry's icon type name to a Nerd Font glyph, with a generic
    /// fallback per kind.
    fn icon(&self, item: &FlatItem) -> &'static str {
        if !self.use_icons {
            return match item.kind {
                EntryKind::Directory => "[D] ",
                EntryKind::File => "[F] ",
            };
        }
        if item.kind == EntryKind::Directory {
            return " ";
        }
        match item.icon_type.as_str() {
            "rs" => " ",
            "py" => " ",
            "js" | "jsx" => " ",
            "ts" | "tsx" => " ",
            "html" | "htm" => " ",
            "css" | "scss" | "sass" => " ",
            "json" => " ",
            "toml" | "yaml" | "yml" | "ini" | "cfg" => " ",
            "md" | "markdown" | "rst" | "txt" => " ",
            "sh" | "bash" | "zsh" | "fish" => " ",
            "go" => " ",
            "c" | "h" => " ",
            "cpp" | "cxx" | "cc" | "hpp" => " ",
            "lock" => " ",
            "gitignore" | "gitmodules" | "gitattributes" => " ",
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "svg" | "ico" | "webp" => " ",
            "zip" | "tar" | "gz" | "xz" | "bz2" | "rar" | "7z" => " ",
            "pdf" => " ",
            _ => " ",
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if self.items.is_empty() || visible_height == 0 {
            return;
        }

        let visible_items = self
            .items
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(visible_height);

        for (i, (idx, item)) in visible_items.enumerate() {
            let y = inner_area.y + i as u16;

            let prefix = Self::build_prefix(item, self.items, idx);
            let disclosure = Self::disclosure(item);
            let icon = self.icon(item);

            let is_selected = idx == self.selected_index;
            let is_staged = self.staged_source == Some(item.path.as_str());

            let style = if is_selected {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if is_staged {
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                match item.kind {
                    EntryKind::Directory => Style::default()
                        .fg(self.theme.tree_dir_fg)
                        .add_modifier(Modifier::BOLD),
                    EntryKind::File => Style::default().fg(self.theme.tree_file_fg),
                }
            };

            let label = format!("{}{}{}{}", prefix, disclosure, icon, item.name);
            let time = &item.last_modified;

            // Name on the left, timestamp right-aligned in the dim column.
            let width = inner_area.width as usize;
            let label_width = label.chars().count();
            let time_width = time.chars().count();
            let spans = if time_width > 0 && label_width + time_width + 2 <= width {
                let pad = width - label_width - time_width;
                vec![
                    Span::styled(label, style),
                    Span::raw(" ".repeat(pad)),
                    Span::styled(
                        time.clone(),
                        Style::default().fg(self.theme.tree_time_fg),
                    ),
                ]
            } else {
                vec![Span::styled(label, style)]
            };

            let line = Line::from(spans);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
