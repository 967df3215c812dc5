use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::colors::DEFAULT_HISTORY_CAPACITY;
use crate::render::{FontSource, SheetGeometry};
use crate::session::ExportOptions;

/// Application-level constants
pub const APP_NAME: &str = "LabelMaker";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HISTORY_FILE_NAME: &str = "order_history.json";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const LOG_FILE_NAME: &str = "label_maker.log";

/// Get the application data directory
/// ~/LabelMaker/ on all platforms. Falls back to the working directory when
/// there is no home directory.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Persisted order color history
pub fn history_path() -> PathBuf {
    app_data_dir().join(HISTORY_FILE_NAME)
}

/// Default location for generated PDFs
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

pub fn settings_path() -> PathBuf {
    app_data_dir().join(SETTINGS_FILE_NAME)
}

pub fn log_path() -> PathBuf {
    app_data_dir().join(LOG_FILE_NAME)
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "label_maker=info,label_maker_lib=info,warn"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read settings {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed settings {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Operator settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub history_capacity: usize,
    pub export_dir: Option<PathBuf>,
    pub history_file: Option<PathBuf>,
    /// TrueType font for label text; built-in Helvetica-Bold when unset.
    pub font_path: Option<PathBuf>,
    pub sheet: SheetGeometry,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            export_dir: None,
            history_file: None,
            font_path: None,
            sheet: SheetGeometry::default(),
        }
    }
}

impl Settings {
    /// Load from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("history_capacity must be at least 1".into()));
        }
        self.sheet
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn history_path(&self) -> PathBuf {
        self.history_file.clone().unwrap_or_else(history_path)
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(exports_dir)
    }

    pub fn font(&self) -> FontSource {
        match &self.font_path {
            Some(path) => FontSource::File(path.clone()),
            None => FontSource::Builtin,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            geometry: self.sheet,
            font: self.font(),
        }
    }
}
