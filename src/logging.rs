//! File-backed tracing setup. The terminal owns stdout/stderr while the
//! TUI is running, so logs go to a daily-rolling file instead.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

/// Directory where log files are written: `~/.local/state/rfm` (or the
/// platform equivalent), falling back to `./logs`.
fn log_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|d| d.join("rfm"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Initialize tracing with a daily-rolling log file.
///
/// `level` is the default directive; `RUST_LOG` still takes precedence.
/// The returned guard must be kept alive for the duration of the program
/// or buffered log lines are lost.
pub fn init(level: &str) -> std::io::Result<WorkerGuard> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;

    let file = rolling::daily(&dir, "rfm.log");
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
