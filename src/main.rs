mod app;
mod components;
mod config;
mod error;
mod event;
mod handler;
mod logging;
mod model;
mod remote;
mod sync;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, ThemeConfig, TreeConfig};
use crate::event::{Event, EventHandler};
use crate::remote::client::HttpRemoteFs;
use crate::tui::{install_panic_hook, Tui};

/// A terminal-based browser for a remote file server.
#[derive(Parser, Debug)]
#[command(name = "remote_tree_tui", version, about)]
struct Cli {
    /// Base URL of the remote file server (e.g. http://localhost:4001)
    #[arg(long)]
    server: Option<String>,

    /// Path to an explicit config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render plain ASCII markers instead of nerd font icons
    #[arg(long)]
    ascii: bool,

    /// Color scheme ("dark" or "light")
    #[arg(long)]
    theme: Option<String>,
}

impl Cli {
    /// Partial config carrying only the flags the user actually passed.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                server_url: self.server.clone(),
                log_level: None,
            },
            tree: TreeConfig {
                use_icons: if self.ascii { Some(false) } else { None },
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let _log_guard = logging::init(&config.log_level())?;

    let server_url = config.server_url();
    if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
        return Err(error::AppError::InvalidUrl(server_url));
    }
    info!(server = %server_url, "starting");

    let theme = theme::resolve_theme(&config.theme_scheme());
    let use_icons = config.use_icons();

    install_panic_hook();

    let mut tui = Tui::new()?;
    let mut app = App::new(HttpRemoteFs::new(&server_url));
    app.init().await;

    let mut events = EventHandler::new(Duration::from_millis(16));

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame, &theme, use_icons);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key).await,
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
