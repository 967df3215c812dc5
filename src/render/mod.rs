//! Label sheet rendering.
//!
//! `layout` turns records into a display list per page (pure, testable);
//! `pdf` paints that list with `printpdf`; `qr` rasterises QR payloads;
//! `output` writes the finished document where the operator expects it.

pub mod geometry;
pub mod layout;
pub mod output;
pub mod pdf;
pub mod qr;

pub use geometry::*;
pub use layout::*;
pub use output::*;
pub use pdf::*;
pub use qr::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No pages were created; there are no labels to print")]
    NoPages,

    #[error("Font file not found at {}", .0.display())]
    FontMissing(PathBuf),

    #[error("Invalid sheet geometry: {0}")]
    Geometry(String),

    #[error("QR payload is empty")]
    EmptyQrPayload,

    #[error("QR generation failed: {0}")]
    Qr(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write PDF: {0}")]
    Write(#[from] std::io::Error),
}
