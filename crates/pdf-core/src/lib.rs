//! PDF Core - Low-level PDF drawing surface
//!
//! This crate provides functionality for:
//! - Creating blank single-page documents or opening template PDFs
//! - Standard (base-14) and embedded TrueType fonts
//! - Inserting aligned and rotated text at specific coordinates
//! - Drawing filled and stroked rectangles and lines
//! - Embedding images (JPEG, PNG) as XObjects
//!
//! All public coordinates are in points with a top-left origin; conversion to
//! the PDF bottom-left origin happens inside [`PdfDocument`].
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, Color, PdfDocument, StandardFont, TextStyle};
//!
//! let mut doc = PdfDocument::new(595.28, 841.89)?;
//! doc.register_standard_family("helvetica", StandardFont::Helvetica, StandardFont::HelveticaBold)?;
//! let style = TextStyle::new("helvetica", 12.0);
//! doc.insert_text("Hello, World!", 1, 100.0, 100.0, Align::Left, &style)?;
//! let bytes = doc.into_bytes()?;
//! ```

mod document;
mod font;
mod graphics;
mod image;
mod text;

pub use document::{Color, PdfDocument, TextStyle};
pub use font::{FontData, FontFamily, FontFamilyBuilder, FontWeight, StandardFont};
pub use graphics::{generate_line_operators, generate_rect_operators, RectStyle, Stroke};
pub use image::{calculate_scaled_dimensions, detect_format, ImageFormat, ImageScaleMode, ImageXObject};
pub use text::{generate_text_operators, wrap_to_width, TextRenderContext};

use thiserror::Error;

/// Points per millimetre
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Invalid page size: {0} x {1}")]
    InvalidPageSize(f64, f64),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Convert millimetres to points
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// Convert points to millimetres
pub fn pt_to_mm(pt: f64) -> f64 {
    pt / POINTS_PER_MM
}
