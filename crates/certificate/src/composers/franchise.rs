//! Tricycle franchise (TODA / transport) permit

use super::{closing, frame, rows, CompositionContext, BLOCK_GAP};
use crate::primitives::{section_header, subtitle, title};
use crate::{PermitRecord, RenderSurface, Result};
use permit_format::{format_currency, format_date};

const NOTICE: &str = "This franchise authorizes operation only within the route and zone \
assigned to the operator's TODA. The unit must be kept roadworthy and the plate number \
displayed at all times. Any transfer of ownership or change of unit requires prior approval \
of the Board, and the franchise must be renewed before it expires.";

pub(super) fn compose(
    surface: &mut RenderSurface,
    record: &PermitRecord,
    ctx: &CompositionContext<'_>,
) -> Result<f64> {
    let y = frame(surface, record, ctx)?;
    let y = title(surface, "FRANCHISE PERMIT", y)?;
    let y = subtitle(surface, "Motorized Tricycle Operator's Permit", y)?;

    let y = rows(
        surface,
        &[
            ("Franchise No.:", Some(record.id.as_str())),
            ("Operator:", record.applicant_name.as_deref()),
            ("Address:", record.address.as_deref()),
            ("Contact No.:", record.contact_number.as_deref()),
            ("Email:", record.email.as_deref()),
            ("TODA/Association:", record.business_name.as_deref()),
            ("Application Type:", record.application_type.as_deref()),
        ],
        y + BLOCK_GAP,
    )?;

    let issued = format_date(record.approved_date.as_deref());
    let valid_until = format_date(record.expiration_date.as_deref());
    let fee = format_currency(record.fee_amount());

    let y = section_header(surface, "FRANCHISE DETAILS", y + BLOCK_GAP)?;
    let y = rows(
        surface,
        &[
            ("Date Granted:", Some(issued.as_str())),
            ("Valid Until:", Some(valid_until.as_str())),
            ("Franchise Fee:", Some(fee.as_str())),
            ("O.R. No.:", record.receipt_number.as_deref()),
            ("Status:", record.status.as_deref()),
        ],
        y,
    )?;

    closing(surface, record, ctx, NOTICE, y)
}
