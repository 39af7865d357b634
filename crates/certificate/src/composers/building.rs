//! Building permit

use super::{closing, frame, rows, CompositionContext, BLOCK_GAP};
use crate::primitives::{section_header, subtitle, title};
use crate::{PermitRecord, RenderSurface, Result};
use permit_format::{format_currency, format_date};

const NOTICE: &str = "This permit is issued pursuant to the National Building Code of the \
Philippines (P.D. 1096). All work shall conform to the approved plans and specifications. \
This permit must be posted at the construction site, and it becomes void if work is not \
started within one year of issuance or is suspended for one year or more.";

pub(super) fn compose(
    surface: &mut RenderSurface,
    record: &PermitRecord,
    ctx: &CompositionContext<'_>,
) -> Result<f64> {
    let y = frame(surface, record, ctx)?;
    let y = title(surface, "BUILDING PERMIT", y)?;
    let y = subtitle(surface, "Office of the Building Official", y)?;

    let y = rows(
        surface,
        &[
            ("Permit No.:", Some(record.id.as_str())),
            ("Owner/Applicant:", record.applicant_name.as_deref()),
            ("Project:", record.business_name.as_deref()),
            ("Location:", record.address.as_deref()),
            ("Scope of Work:", record.application_type.as_deref()),
        ],
        y + BLOCK_GAP,
    )?;

    let issued = format_date(record.approved_date.as_deref());
    let valid_until = format_date(record.expiration_date.as_deref());
    let fee = format_currency(record.fee_amount());

    let y = section_header(surface, "PERMIT VALIDITY", y + BLOCK_GAP)?;
    let y = rows(
        surface,
        &[
            ("Date Issued:", Some(issued.as_str())),
            ("Valid Until:", Some(valid_until.as_str())),
            ("Permit Fee:", Some(fee.as_str())),
            ("O.R. No.:", record.receipt_number.as_deref()),
            ("Status:", record.status.as_deref()),
            ("Remarks:", record.remarks_text()),
        ],
        y,
    )?;

    closing(surface, record, ctx, NOTICE, y)
}
