pub mod collaborators;
pub mod colors; // Order colors + persisted history
pub mod commands;
pub mod config;
pub mod core_state;
pub mod intake; // File name parsing + record building
pub mod models;
pub mod render; // Layout, QR, PDF
pub mod session;

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing: stderr always, plus `log_file` (no ANSI colors) when
/// given. `RUST_LOG` overrides the default filter.
///
/// A log file that cannot be opened, or whose directory cannot be created,
/// is reported and skipped.
pub fn init_tracing(log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));

    let mut open_error = None;
    let file_layer = log_file.and_then(|path| match open_log_file(path) {
        Ok(file) => Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
        Err(e) => {
            open_error = Some((path.to_path_buf(), e));
            None
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    if let Some((path, e)) = open_error {
        tracing::warn!(path = %path.display(), error = %e, "Log file unavailable");
    }
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}

/// Open `path` for appending, creating its directory first.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
