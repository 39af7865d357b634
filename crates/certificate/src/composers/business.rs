//! Mayor's permit to operate a business

use super::{closing, frame, rows, CompositionContext, BLOCK_GAP};
use crate::primitives::{section_header, subtitle, title};
use crate::{PermitRecord, RenderSurface, Result};
use permit_format::{format_currency, format_date};

const NOTICE: &str = "This permit must be displayed conspicuously at the place of business. \
It is non-transferable and valid only for the business name and address stated herein. \
Renewal must be filed on or before the expiration date to avoid penalties and surcharges.";

pub(super) fn compose(
    surface: &mut RenderSurface,
    record: &PermitRecord,
    ctx: &CompositionContext<'_>,
) -> Result<f64> {
    let y = frame(surface, record, ctx)?;
    let y = title(surface, "BUSINESS PERMIT", y)?;
    let y = subtitle(surface, "Mayor's Permit to Operate", y)?;

    let y = rows(
        surface,
        &[
            ("Permit No.:", Some(record.id.as_str())),
            ("Business Name:", record.business_name.as_deref()),
            ("Owner/Applicant:", record.applicant_name.as_deref()),
            ("Business Address:", record.address.as_deref()),
            ("Contact No.:", record.contact_number.as_deref()),
            ("Email:", record.email.as_deref()),
            ("Application Type:", record.application_type.as_deref()),
        ],
        y + BLOCK_GAP,
    )?;

    let issued = format_date(record.approved_date.as_deref());
    let valid_until = format_date(record.expiration_date.as_deref());
    let fee = format_currency(record.fee_amount());

    let y = section_header(surface, "PERMIT DETAILS", y + BLOCK_GAP)?;
    let y = rows(
        surface,
        &[
            ("Date Issued:", Some(issued.as_str())),
            ("Valid Until:", Some(valid_until.as_str())),
            ("Permit Fee:", Some(fee.as_str())),
            ("O.R. No.:", record.receipt_number.as_deref()),
            ("Status:", record.status.as_deref()),
        ],
        y,
    )?;

    closing(surface, record, ctx, NOTICE, y)
}
