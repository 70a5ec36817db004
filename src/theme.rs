//! Theme data model: built-in palettes and resolution from config.

use ratatui::style::Color;

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree panel
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub tree_dir_fg: Color,
    pub tree_file_fg: Color,
    pub tree_time_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,

    // Semantic colors (consistent across themes)
    pub error_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(205, 214, 244),          // #cdd6f4 (text)
        tree_selected_bg: Color::Rgb(69, 71, 90),    // #45475a (surface1)
        tree_selected_fg: Color::Rgb(205, 214, 244), // #cdd6f4
        tree_dir_fg: Color::Rgb(137, 180, 250),      // #89b4fa (blue)
        tree_file_fg: Color::Rgb(205, 214, 244),     // #cdd6f4
        tree_time_fg: Color::Rgb(108, 112, 134),     // #6c7086 (overlay0)

        status_bg: Color::Rgb(49, 50, 68), // #313244 (surface0)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112), // #585b70 (surface2)

        error_fg: Color::Rgb(243, 139, 168),  // #f38ba8 (red)
        accent_fg: Color::Rgb(250, 179, 135), // #fab387 (peach)
        dim_fg: Color::Rgb(108, 112, 134),    // #6c7086
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(76, 79, 105),             // #4c4f69 (text)
        tree_selected_bg: Color::Rgb(188, 192, 204),  // #bcc0cc (surface1)
        tree_selected_fg: Color::Rgb(76, 79, 105),    // #4c4f69
        tree_dir_fg: Color::Rgb(30, 102, 245),        // #1e66f5 (blue)
        tree_file_fg: Color::Rgb(76, 79, 105),        // #4c4f69
        tree_time_fg: Color::Rgb(140, 143, 161),      // #8c8fa1 (overlay1)

        status_bg: Color::Rgb(204, 208, 218), // #ccd0da (surface0)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)

        error_fg: Color::Rgb(210, 15, 57),   // #d20f39 (red)
        accent_fg: Color::Rgb(254, 100, 11), // #fe640b (peach)
        dim_fg: Color::Rgb(140, 143, 161),   // #8c8fa1
    }
}

/// Resolve the runtime theme from the config scheme name.
/// Unknown schemes fall back to dark.
pub fn resolve_theme(scheme: &str) -> ThemeColors {
    match scheme {
        "light" => light_theme(),
        _ => dark_theme(),
    }
}
