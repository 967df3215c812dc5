//! Order colors: the session map plus the persisted "recent orders" history.

pub mod history;
pub mod registry;

pub use history::*;
pub use registry::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed history file: {0}")]
    Malformed(#[from] serde_json::Error),
}
