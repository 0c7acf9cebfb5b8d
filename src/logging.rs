//! Tracing subscriber bootstrap.
//!
//! The filter comes from `GTD_LOG` (same syntax as `RUST_LOG`) and defaults
//! to `warn`. Initialization is a no-op once a subscriber is installed.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "GTD_LOG";
const DEFAULT_LEVEL: &str = "warn";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Compact human-readable logs on stderr, for CLI commands.
pub fn init_stderr() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();
    let _ = subscriber.try_init();
}

/// Logs appended to `path`, for the TUI where stderr shares the screen.
///
/// Falls back to discarding output if the file cannot be opened.
pub fn init_file(path: &Path) {
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(_) => return,
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact();
    let _ = subscriber.try_init();
}
