//! Per-category certificate layouts
//!
//! Every composer follows the same skeleton: frame (border, watermark, plate,
//! header), title, category rows and sections, then the notice, signatures
//! and footer. Composers only decide which fields, notice and signers appear.

mod barangay;
mod building;
mod business;
mod franchise;

use crate::primitives::{self, CompositionLine, HeaderLogos, Signer};
use crate::{EngineConfig, PermitCategory, PermitRecord, RenderSurface, Result};
use chrono::{DateTime, Utc};
use log::debug;
use permit_format::reference_code;

/// Gap between the plate and the top of the header block
const HEADER_TOP_OFFSET: f64 = 20.0;
/// Space between the header block and the title baseline
const TITLE_GAP: f64 = 6.0;
/// Space between blocks of rows
const BLOCK_GAP: f64 = 3.0;

/// Everything a composer needs besides the record
///
/// Built per generation call; assets are already loaded, so composition does
/// no I/O.
#[derive(Debug, Clone)]
pub struct CompositionContext<'a> {
    pub header_lines: Vec<CompositionLine>,
    pub logos: HeaderLogos<'a>,
    pub signers: Vec<Signer>,
    pub watermark: String,
    pub disclaimer: String,
    pub attribution: String,
    /// Feeds the footer reference token
    pub issued_at: DateTime<Utc>,
}

impl<'a> CompositionContext<'a> {
    /// Resolve the category-specific parts of `config`
    pub fn from_config(
        config: &EngineConfig,
        category: PermitCategory,
        logos: HeaderLogos<'a>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            header_lines: config.header_lines(category),
            logos,
            signers: config.signers.for_category(category).to_vec(),
            watermark: config.watermark_label(category),
            disclaimer: config.footer.disclaimer.clone(),
            attribution: config.footer.attribution.clone(),
            issued_at,
        }
    }

    /// Footer reference: record id plus a token derived from the issue time
    pub fn reference(&self, record_id: &str) -> String {
        let nanos = self.issued_at.timestamp_nanos_opt().unwrap_or_default().max(0) as u128;
        format!("Reference No: {}", reference_code(record_id, nanos))
    }
}

/// Lay out a full certificate for `category`; returns the final cursor
pub fn compose(
    surface: &mut RenderSurface,
    category: PermitCategory,
    record: &PermitRecord,
    ctx: &CompositionContext<'_>,
) -> Result<f64> {
    debug!("Composing {category} certificate for record {}", record.id);

    match category {
        PermitCategory::Business => business::compose(surface, record, ctx),
        PermitCategory::Franchise => franchise::compose(surface, record, ctx),
        PermitCategory::Building => building::compose(surface, record, ctx),
        PermitCategory::Barangay => barangay::compose(surface, record, ctx),
    }
}

/// Border, watermark, plate and header; returns the cursor below the header
fn frame(surface: &mut RenderSurface, record: &PermitRecord, ctx: &CompositionContext<'_>) -> Result<f64> {
    primitives::border(surface)?;
    primitives::watermark(surface, &ctx.watermark)?;
    primitives::identifier_plate(surface, &record.id)?;

    let top = surface.geometry().margin + HEADER_TOP_OFFSET;
    let y = primitives::header_block(surface, ctx.logos, &ctx.header_lines, top)?;
    Ok(y + TITLE_GAP)
}

/// Notice, signatures and footer
fn closing(
    surface: &mut RenderSurface,
    record: &PermitRecord,
    ctx: &CompositionContext<'_>,
    notice: &str,
    y: f64,
) -> Result<f64> {
    let y = primitives::notice_box(surface, notice, y + BLOCK_GAP)?;
    let y = primitives::signature_block(surface, &ctx.signers, y)?;
    primitives::footer_stamp(
        surface,
        &ctx.disclaimer,
        &ctx.reference(&record.id),
        &ctx.attribution,
    )?;
    Ok(y)
}

/// A run of label/value rows
fn rows(surface: &mut RenderSurface, entries: &[(&str, Option<&str>)], y: f64) -> Result<f64> {
    let mut y = y;
    for (label, value) in entries {
        y = primitives::label_value_row(surface, label, *value, y)?;
    }
    Ok(y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentGeometry, SurfaceCapabilities};
    use chrono::TimeZone;

    fn context(category: PermitCategory) -> CompositionContext<'static> {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        CompositionContext::from_config(&EngineConfig::default(), category, HeaderLogos::default(), issued_at)
    }

    fn surface() -> RenderSurface {
        RenderSurface::begin(DocumentGeometry::default(), SurfaceCapabilities::default()).unwrap()
    }

    #[test]
    fn test_every_category_fits_the_page() {
        let record = PermitRecord {
            id: "X-1".to_string(),
            remarks: Some("Subject to annual inspection of the premises and equipment.".to_string()),
            ..Default::default()
        };

        for category in PermitCategory::ALL {
            let mut s = surface();
            let end = compose(&mut s, category, &record, &context(category)).unwrap();
            let geometry = s.geometry();
            // Content must end above the footer rule
            assert!(
                end < geometry.page_height - geometry.margin - 14.0,
                "{category} ends at {end}"
            );
        }
    }

    #[test]
    fn test_empty_record_composes() {
        let record = PermitRecord::default();
        for category in PermitCategory::ALL {
            let mut s = surface();
            assert!(compose(&mut s, category, &record, &context(category)).is_ok());
            assert!(!s.finish().unwrap().is_empty());
        }
    }

    #[test]
    fn test_reference_is_deterministic_for_issue_time() {
        let ctx = context(PermitCategory::Business);
        assert_eq!(ctx.reference("BUS1"), ctx.reference("BUS1"));
        assert!(ctx.reference("BUS1").starts_with("Reference No: BUS1-"));
    }

    #[test]
    fn test_context_uses_category_signers() {
        let ctx = context(PermitCategory::Barangay);
        assert_eq!(ctx.signers[0].name, "PUNONG BARANGAY");
        assert_eq!(ctx.watermark, "CLEARANCE");
    }
}
