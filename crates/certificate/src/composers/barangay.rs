//! Barangay clearance

use super::{closing, frame, rows, CompositionContext, BLOCK_GAP};
use crate::primitives::{banner, paragraph, section_header, title};
use crate::{PermitRecord, RenderSurface, Result};
use permit_format::{format_currency, format_date, NOT_AVAILABLE};

const NOTICE: &str = "This clearance is issued upon the request of the above-named person \
for the purpose stated herein. It is valid for six months from the date of issue unless \
sooner revoked, and is not valid without the official barangay seal.";

/// Certification paragraph naming the applicant
fn certification(record: &PermitRecord) -> String {
    let field = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(NOT_AVAILABLE)
            .to_string()
    };

    format!(
        "This is to certify that {}, with address at {}, is a bona fide resident of this \
         barangay and has no derogatory record on file in this office as of this date.",
        field(&record.applicant_name),
        field(&record.address)
    )
}

pub(super) fn compose(
    surface: &mut RenderSurface,
    record: &PermitRecord,
    ctx: &CompositionContext<'_>,
) -> Result<f64> {
    let y = frame(surface, record, ctx)?;
    let y = title(surface, "BARANGAY CLEARANCE", y)?;

    let y = banner(surface, "TO WHOM IT MAY CONCERN:", y + BLOCK_GAP)?;
    let y = paragraph(surface, &certification(record), y)?;

    let y = rows(
        surface,
        &[
            ("Clearance No.:", Some(record.id.as_str())),
            ("Name:", record.applicant_name.as_deref()),
            ("Address:", record.address.as_deref()),
            ("Purpose:", record.application_type.as_deref()),
        ],
        y + BLOCK_GAP,
    )?;

    let issued = format_date(record.approved_date.as_deref());
    let valid_until = format_date(record.expiration_date.as_deref());
    let fee = format_currency(record.fee_amount());

    let y = section_header(surface, "CLEARANCE DETAILS", y + BLOCK_GAP)?;
    let y = rows(
        surface,
        &[
            ("Date Issued:", Some(issued.as_str())),
            ("Valid Until:", Some(valid_until.as_str())),
            ("Clearance Fee:", Some(fee.as_str())),
            ("O.R. No.:", record.receipt_number.as_deref()),
        ],
        y,
    )?;

    closing(surface, record, ctx, NOTICE, y)
}
