//! Certificate generation entry point

use crate::composers::{self, CompositionContext};
use crate::overlay::render_overlay;
use crate::primitives::HeaderLogos;
use crate::{
    AssetCache, AssetFetcher, CertificateError, EngineConfig, FileFetcher, FontPaths,
    PermitCategory, PermitRecord, RenderSurface, Result,
};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use pdf_core::{FontFamily, FontFamilyBuilder, ImageXObject};
use std::sync::Arc;

/// Family name used for configured TrueType fonts
const BODY_FAMILY: &str = "body";

/// Pre-printed artwork an overlay is drawn onto
#[derive(Debug, Clone)]
pub enum TemplateBackground {
    /// JPEG or PNG stretched over a blank page
    Image(Vec<u8>),
    /// Existing PDF; the overlay is appended to its first page
    Pdf(Vec<u8>),
    /// Image asset id, loaded through the engine's asset cache
    Source(String),
}

/// A finished certificate
#[derive(Debug, Clone)]
pub struct GeneratedCertificate {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub category: PermitCategory,
}

/// Read and parse the configured TrueType faces
fn load_fonts(paths: &FontPaths) -> Result<FontFamily> {
    let mut builder = FontFamilyBuilder::new().regular(std::fs::read(&paths.regular)?);
    if let Some(path) = &paths.bold {
        builder = builder.bold(std::fs::read(path)?);
    }
    Ok(builder.build(BODY_FAMILY)?)
}

/// Generates permit certificates from records
///
/// One engine is shared by every caller; each generation builds its own
/// surface, so calls may run concurrently. The asset cache is the only state
/// shared between calls.
#[derive(Clone)]
pub struct CertificateEngine {
    config: EngineConfig,
    assets: AssetCache,
    /// Parsed once; every surface gets a clone sharing the font bytes
    fonts: Option<FontFamily>,
}

impl CertificateEngine {
    /// Engine loading assets from the filesystem
    pub fn new(config: EngineConfig) -> Self {
        let fetcher = Arc::new(FileFetcher::new(config.asset_root.clone()));
        Self::with_fetcher(config, fetcher)
    }

    /// Engine loading assets through `fetcher`
    pub fn with_fetcher(config: EngineConfig, fetcher: Arc<dyn AssetFetcher>) -> Self {
        let assets = AssetCache::with_fetcher(fetcher, config.asset_cache_capacity);

        let fonts = config.fonts.as_ref().and_then(|paths| match load_fonts(paths) {
            Ok(family) => Some(family),
            Err(e) => {
                warn!(
                    "Failed to read font {}: {}; using Helvetica",
                    paths.regular.display(),
                    e
                );
                None
            }
        });

        Self {
            config,
            assets,
            fonts,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    /// Compose a complete certificate for `record`
    pub fn generate(&self, record: &PermitRecord) -> Result<GeneratedCertificate> {
        self.generate_at(record, Utc::now())
    }

    /// Same as [`generate`](Self::generate) with a fixed issue time
    ///
    /// The issue time only feeds the footer reference, so a fixed value
    /// gives reproducible output.
    pub fn generate_at(
        &self,
        record: &PermitRecord,
        issued_at: DateTime<Utc>,
    ) -> Result<GeneratedCertificate> {
        let category = record.category();
        debug!("Generating {category} certificate for record {}", record.id);

        self.compose(record, category, issued_at)
            .map(|pdf| self.finished(record, category, pdf))
            .map_err(|e| failed(record, e))
    }

    /// Draw the record's fields onto pre-printed artwork
    pub fn generate_overlay(
        &self,
        record: &PermitRecord,
        background: &TemplateBackground,
    ) -> Result<GeneratedCertificate> {
        let category = record.category();
        debug!("Generating {category} overlay for record {}", record.id);

        self.overlay(record, category, background)
            .map(|pdf| self.finished(record, category, pdf))
            .map_err(|e| failed(record, e))
    }

    fn compose(
        &self,
        record: &PermitRecord,
        category: PermitCategory,
        issued_at: DateTime<Utc>,
    ) -> Result<Vec<u8>> {
        // Assets are resolved before the surface exists; a missing logo is skipped
        let left = self.config.logos.left.as_deref().and_then(|s| self.assets.load(s));
        let right = self.config.logos.right.as_deref().and_then(|s| self.assets.load(s));
        let logos = HeaderLogos {
            left: left.as_deref(),
            right: right.as_deref(),
        };

        let mut surface =
            RenderSurface::begin(self.config.geometry.clone(), self.config.capabilities)?;
        self.apply_fonts(&mut surface)?;

        let ctx = CompositionContext::from_config(&self.config, category, logos, issued_at);
        let end = composers::compose(&mut surface, category, record, &ctx)?;
        debug!("Composition for record {} ended at y = {end:.1} mm", record.id);

        surface.finish()
    }

    fn overlay(
        &self,
        record: &PermitRecord,
        category: PermitCategory,
        background: &TemplateBackground,
    ) -> Result<Vec<u8>> {
        let mut surface = match background {
            TemplateBackground::Image(data) => {
                let image = ImageXObject::decode(data)
                    .map_err(|e| CertificateError::TemplateError(e.to_string()))?;
                RenderSurface::on_template_image(
                    &image,
                    self.config.geometry.clone(),
                    self.config.capabilities,
                )?
            }
            TemplateBackground::Pdf(data) => RenderSurface::on_template_pdf(
                data,
                &self.config.geometry,
                self.config.capabilities,
            )
            .map_err(|e| CertificateError::TemplateError(e.to_string()))?,
            TemplateBackground::Source(source) => {
                let image = self.assets.load(source).ok_or_else(|| {
                    CertificateError::TemplateError(format!(
                        "background {source} could not be loaded"
                    ))
                })?;
                RenderSurface::on_template_image(
                    &image,
                    self.config.geometry.clone(),
                    self.config.capabilities,
                )?
            }
        };
        self.apply_fonts(&mut surface)?;

        let table = self.config.overlay.for_category(category);
        render_overlay(&mut surface, &table, record)?;

        surface.finish()
    }

    fn apply_fonts(&self, surface: &mut RenderSurface) -> Result<()> {
        if let Some(family) = &self.fonts {
            surface.use_font_family(BODY_FAMILY, family.clone())?;
        }
        Ok(())
    }

    fn finished(
        &self,
        record: &PermitRecord,
        category: PermitCategory,
        pdf: Vec<u8>,
    ) -> GeneratedCertificate {
        debug!("Generated {} bytes for record {}", pdf.len(), record.id);
        GeneratedCertificate {
            filename: record.filename(),
            pdf,
            category,
        }
    }
}

fn failed(record: &PermitRecord, source: CertificateError) -> CertificateError {
    CertificateError::GenerationFailed {
        record_id: record.id.clone(),
        source: Box::new(source),
    }
}
