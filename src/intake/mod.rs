//! Chip file intake: file names in, label records out.
//!
//! - `filename`: pulls order name, label type and record range out of a name
//! - `builder`: dedups by (order, type), numbers batches, tracks shown files

pub mod builder;
pub mod filename;

pub use builder::*;
pub use filename::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("File not found or inaccessible: {0}")]
    Inaccessible(String),

    #[error("File name is not valid UTF-8: {0}")]
    InvalidName(String),

    #[error("No order name in '{0}'")]
    EmptyOrderName(String),
}
