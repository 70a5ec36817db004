//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--server`, `--config`, `--ascii`, `--theme`)
//! 2. `$RFM_CONFIG` environment variable (path to config file)
//! 3. Project-local `.rfm.toml` in the current working directory
//! 4. Global `~/.config/rfm/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Base URL of the remote file server.
    pub server_url: Option<String>,
    /// Log level filter ("error", "warn", "info", "debug", "trace").
    pub log_level: Option<String>,
}

/// Tree panel settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Use nerd font icons (false = ASCII fallback).
    pub use_icons: Option<bool>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark" or "light".
    pub scheme: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub tree: TreeConfig,
    pub theme: ThemeConfig,
}

/// Default server when neither CLI nor config name one.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:4001";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path — that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. $RFM_CONFIG environment variable
    if let Ok(env_path) = std::env::var("RFM_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    // 2. Project-local `.rfm.toml` in CWD
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".rfm.toml"));
    }

    // 3. Global `~/.config/rfm/config.toml`
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("rfm").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self` — `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                server_url: other
                    .general
                    .server_url
                    .clone()
                    .or(self.general.server_url),
                log_level: other.general.log_level.clone().or(self.general.log_level),
            },
            tree: TreeConfig {
                use_icons: other.tree.use_icons.or(self.tree.use_icons),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Load from candidate files, lowest priority first so higher overwrites.
        let paths = candidate_paths();
        for path in paths.iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        // Explicit --config file has higher priority than candidates.
        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        // CLI flag overrides are highest priority.
        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Base URL of the remote file server.
    pub fn server_url(&self) -> String {
        self.general
            .server_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    /// Log level filter.
    pub fn log_level(&self) -> String {
        self.general
            .log_level
            .clone()
            .unwrap_or_else(|| "info".to_string())
    }

    /// Whether to render nerd font icons.
    pub fn use_icons(&self) -> bool {
        self.tree.use_icons.unwrap_or(true)
    }

    /// Theme scheme name.
    pub fn theme_scheme(&self) -> String {
        self.theme.scheme.clone().unwrap_or_else(|| "dark".to_string())
    }
}
