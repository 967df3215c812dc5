pub mod color;
pub mod enums;
pub mod label;

pub use color::*;
pub use enums::*;
pub use label::*;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Invalid color '{0}': expected 6 hex digits (RRGGBB)")]
    InvalidColor(String),
}
