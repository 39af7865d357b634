//! Engine configuration

use crate::overlay::{default_table, OverlayEntry};
use crate::{CertificateError, CompositionLine, DocumentGeometry, PermitCategory, Result, Signer, SurfaceCapabilities};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Logo sources for the header block, resolved through the asset fetcher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoSources {
    pub left: Option<String>,
    pub right: Option<String>,
}

/// Signature columns per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerRoster {
    pub business: Vec<Signer>,
    pub franchise: Vec<Signer>,
    pub building: Vec<Signer>,
    pub barangay: Vec<Signer>,
}

impl Default for SignerRoster {
    fn default() -> Self {
        Self {
            business: vec![
                Signer::new("CITY MAYOR", "Local Chief Executive"),
                Signer::new("BPLO HEAD", "Business Permits and Licensing Officer"),
            ],
            franchise: vec![
                Signer::new("TFRB CHAIRMAN", "Tricycle Franchising and Regulatory Board"),
                Signer::new("CITY MAYOR", "Local Chief Executive"),
            ],
            building: vec![
                Signer::new("BUILDING OFFICIAL", "Office of the Building Official"),
                Signer::new("CITY ENGINEER", "City Engineering Office"),
            ],
            barangay: vec![
                Signer::new("PUNONG BARANGAY", "Barangay Captain"),
                Signer::new("BARANGAY SECRETARY", "Office of the Barangay Secretary"),
            ],
        }
    }
}

impl SignerRoster {
    pub fn for_category(&self, category: PermitCategory) -> &[Signer] {
        match category {
            PermitCategory::Business => &self.business,
            PermitCategory::Franchise => &self.franchise,
            PermitCategory::Building => &self.building,
            PermitCategory::Barangay => &self.barangay,
        }
    }
}

/// Footer lines around the generated reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub disclaimer: String,
    pub attribution: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            disclaimer: "This is a system-generated digital copy. Verify authenticity with the issuing office."
                .to_string(),
            attribution: "Generated by the Permit Certificate System".to_string(),
        }
    }
}

/// TrueType files replacing the built-in Helvetica
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontPaths {
    pub regular: PathBuf,
    #[serde(default)]
    pub bold: Option<PathBuf>,
}

/// Overlay field tables overriding the built-in ones
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayTables {
    pub business: Option<Vec<OverlayEntry>>,
    pub franchise: Option<Vec<OverlayEntry>>,
    pub building: Option<Vec<OverlayEntry>>,
    pub barangay: Option<Vec<OverlayEntry>>,
}

impl OverlayTables {
    /// Configured table for a category, or the built-in one
    pub fn for_category(&self, category: PermitCategory) -> Vec<OverlayEntry> {
        let configured = match category {
            PermitCategory::Business => &self.business,
            PermitCategory::Franchise => &self.franchise,
            PermitCategory::Building => &self.building,
            PermitCategory::Barangay => &self.barangay,
        };
        configured.clone().unwrap_or_else(|| default_table(category))
    }
}

/// Everything an engine needs besides the records themselves
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub geometry: DocumentGeometry,
    /// Issuer lines at the top of the header block
    pub issuer: Vec<CompositionLine>,
    pub logos: LogoSources,
    pub signers: SignerRoster,
    pub footer: FooterConfig,
    /// Replaces the per-category watermark label
    pub watermark: Option<String>,
    pub capabilities: SurfaceCapabilities,
    pub fonts: Option<FontPaths>,
    /// Base directory for relative logo paths
    pub asset_root: Option<PathBuf>,
    /// Maximum number of cached images; unbounded when absent
    pub asset_cache_capacity: Option<u64>,
    pub overlay: OverlayTables,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            geometry: DocumentGeometry::default(),
            issuer: vec![
                CompositionLine::new("Republic of the Philippines", 10.0, false),
                CompositionLine::new("CITY GOVERNMENT", 14.0, true),
            ],
            logos: LogoSources::default(),
            signers: SignerRoster::default(),
            footer: FooterConfig::default(),
            watermark: None,
            capabilities: SurfaceCapabilities::default(),
            fonts: None,
            asset_root: None,
            asset_cache_capacity: None,
            overlay: OverlayTables::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CertificateError::ConfigError(e.to_string()))
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CertificateError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Header lines for a category: issuer lines then the issuing office
    pub fn header_lines(&self, category: PermitCategory) -> Vec<CompositionLine> {
        let office = match category {
            PermitCategory::Business => "BUSINESS PERMITS AND LICENSING OFFICE",
            PermitCategory::Franchise => "TRICYCLE FRANCHISING AND REGULATORY BOARD",
            PermitCategory::Building => "OFFICE OF THE BUILDING OFFICIAL",
            PermitCategory::Barangay => "OFFICE OF THE PUNONG BARANGAY",
        };

        let mut lines = self.issuer.clone();
        lines.push(CompositionLine::new(office, 11.0, true));
        lines
    }

    /// Watermark label for a category
    pub fn watermark_label(&self, category: PermitCategory) -> String {
        if let Some(label) = &self.watermark {
            return label.clone();
        }

        match category {
            PermitCategory::Business => "BUSINESS PERMIT",
            PermitCategory::Franchise => "FRANCHISE",
            PermitCategory::Building => "BUILDING PERMIT",
            PermitCategory::Barangay => "CLEARANCE",
        }
        .to_string()
    }
}
