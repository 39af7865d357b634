//! Certificate - permit certificate composition engine
//!
//! This crate provides:
//! - Permit record model and category classification
//! - A render surface with a millimetre coordinate model and layout cursor
//! - Drawing primitives (border, watermark, plate, header, rows, notices...)
//! - Per-category composers (business, franchise, building, barangay)
//! - Overlay rendering onto pre-printed templates
//! - A shared, memoized image asset cache
//!
//! # Example
//!
//! ```ignore
//! use certificate::{CertificateEngine, EngineConfig, PermitRecord};
//!
//! let engine = CertificateEngine::new(EngineConfig::from_file("engine.json")?);
//! let record = PermitRecord::from_json(record_json)?;
//! let certificate = engine.generate(&record)?;
//! std::fs::write(&certificate.filename, &certificate.pdf)?;
//! ```

pub mod assets;
mod category;
pub mod composers;
mod config;
mod engine;
mod geometry;
pub mod overlay;
pub mod primitives;
mod record;
mod surface;

pub use assets::{AssetCache, AssetFetcher, FileFetcher, StaticFetcher};
pub use category::PermitCategory;
pub use config::{EngineConfig, FontPaths, FooterConfig, LogoSources, OverlayTables, SignerRoster};
pub use engine::{CertificateEngine, GeneratedCertificate, TemplateBackground};
pub use geometry::{DocumentGeometry, Palette, Rgb};
pub use overlay::{FieldSelector, OverlayEntry, OverlayStyle};
pub use primitives::{CompositionLine, OverlayAlign, Signer};
pub use record::{FeeValue, PermitRecord};
pub use surface::{PaintState, RenderSurface, SurfaceCapabilities};

use thiserror::Error;

/// Errors that can occur during certificate generation
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid permit record: {0}")]
    RecordError(String),

    #[error("Asset error: {0}")]
    AssetError(String),

    #[error("Invalid template background: {0}")]
    TemplateError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Certificate generation failed for record {record_id}: {source}")]
    GenerationFailed {
        record_id: String,
        #[source]
        source: Box<CertificateError>,
    },
}

/// Result type for certificate operations
pub type Result<T> = std::result::Result<T, CertificateError>;
