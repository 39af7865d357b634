//! Overlay mode: values painted onto a pre-printed template
//!
//! Each category has a table of boxes (millimetres, top-left origin) matched
//! to its printed form. Every box is blanked and refilled with one record
//! field. Tables can be replaced through [`crate::OverlayTables`].

use crate::geometry::Rgb;
use crate::primitives::{overlay_patch, OverlayAlign, PatchText};
use crate::{PermitCategory, PermitRecord, RenderSurface, Result};
use log::debug;
use permit_format::{format_currency, format_date};
use serde::{Deserialize, Serialize};

/// Record value shown in an overlay box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSelector {
    PlateNumber,
    Id,
    PermitType,
    ApplicantName,
    BusinessName,
    Address,
    ContactNumber,
    Email,
    Status,
    SubmittedDate,
    ApprovedDate,
    ExpirationDate,
    Fees,
    ReceiptNumber,
    Remarks,
    ApplicationType,
}

impl FieldSelector {
    /// Display value for this field; `None` prints as "N/A"
    pub fn resolve(&self, record: &PermitRecord) -> Option<String> {
        let text = |value: &Option<String>| value.clone();

        match self {
            Self::PlateNumber => Some(record.plate_number()),
            Self::Id => Some(record.id.clone()),
            Self::PermitType => Some(record.permit_type_label().to_string()),
            Self::ApplicantName => text(&record.applicant_name),
            Self::BusinessName => text(&record.business_name),
            Self::Address => text(&record.address),
            Self::ContactNumber => text(&record.contact_number),
            Self::Email => text(&record.email),
            Self::Status => text(&record.status),
            Self::SubmittedDate => Some(format_date(record.submitted_date.as_deref())),
            Self::ApprovedDate => Some(format_date(record.approved_date.as_deref())),
            Self::ExpirationDate => Some(format_date(record.expiration_date.as_deref())),
            Self::Fees => Some(format_currency(record.fee_amount())),
            Self::ReceiptNumber => text(&record.receipt_number),
            Self::Remarks => record.remarks_text().map(str::to_string),
            Self::ApplicationType => text(&record.application_type),
        }
    }
}

fn default_font_size() -> f32 {
    9.0
}

/// Text options for one overlay box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub font_size: f32,
    pub bold: bool,
    pub align: OverlayAlign,
    /// Palette dark text when absent
    pub color: Option<Rgb>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            bold: false,
            align: OverlayAlign::Left,
            color: None,
        }
    }
}

/// One box of an overlay table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayEntry {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub field: FieldSelector,
    #[serde(default)]
    pub style: OverlayStyle,
}

impl OverlayEntry {
    pub fn new(x: f64, y: f64, w: f64, h: f64, field: FieldSelector) -> Self {
        Self {
            x,
            y,
            w,
            h,
            field,
            style: OverlayStyle::default(),
        }
    }

    fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    fn centered(mut self) -> Self {
        self.style.align = OverlayAlign::Center;
        self
    }

    fn sized(mut self, font_size: f32) -> Self {
        self.style.font_size = font_size;
        self
    }
}

/// Paint every entry of `table` once, in order
pub fn render_overlay(surface: &mut RenderSurface, table: &[OverlayEntry], record: &PermitRecord) -> Result<()> {
    debug!("Rendering {} overlay fields for record {}", table.len(), record.id);
    let dark = surface.geometry().palette.dark;

    for entry in table {
        let value = entry.field.resolve(record);
        let opts = PatchText {
            font_size: entry.style.font_size,
            bold: entry.style.bold,
            align: entry.style.align,
            color: entry.style.color.unwrap_or(dark).to_color(),
        };
        overlay_patch(
            surface,
            entry.x,
            entry.y,
            entry.w,
            entry.h,
            value.as_deref(),
            &opts,
        )?;
    }

    Ok(())
}

/// Built-in field table for a category's A4 template
pub fn default_table(category: PermitCategory) -> Vec<OverlayEntry> {
    use FieldSelector::*;

    let plate = OverlayEntry::new(157.0, 22.0, 34.0, 9.0, PlateNumber)
        .bold()
        .centered()
        .sized(14.0);

    match category {
        PermitCategory::Business => vec![
            plate,
            OverlayEntry::new(75.0, 88.0, 60.0, 6.0, Id),
            OverlayEntry::new(75.0, 96.0, 115.0, 6.0, BusinessName).bold().sized(11.0),
            OverlayEntry::new(75.0, 104.0, 115.0, 6.0, ApplicantName),
            OverlayEntry::new(75.0, 112.0, 115.0, 6.0, Address),
            OverlayEntry::new(75.0, 120.0, 60.0, 6.0, ContactNumber),
            OverlayEntry::new(75.0, 128.0, 115.0, 6.0, Email),
            OverlayEntry::new(75.0, 136.0, 60.0, 6.0, ApplicationType),
            OverlayEntry::new(75.0, 156.0, 60.0, 6.0, ApprovedDate),
            OverlayEntry::new(75.0, 164.0, 60.0, 6.0, ExpirationDate),
            OverlayEntry::new(75.0, 172.0, 60.0, 6.0, Fees),
            OverlayEntry::new(75.0, 180.0, 60.0, 6.0, ReceiptNumber),
            OverlayEntry::new(75.0, 188.0, 60.0, 6.0, Status),
        ],
        PermitCategory::Franchise => vec![
            plate,
            OverlayEntry::new(75.0, 88.0, 60.0, 6.0, Id),
            OverlayEntry::new(75.0, 96.0, 115.0, 6.0, ApplicantName).bold().sized(11.0),
            OverlayEntry::new(75.0, 104.0, 115.0, 6.0, Address),
            OverlayEntry::new(75.0, 112.0, 60.0, 6.0, ContactNumber),
            OverlayEntry::new(75.0, 120.0, 115.0, 6.0, BusinessName),
            OverlayEntry::new(75.0, 128.0, 60.0, 6.0, ApplicationType),
            OverlayEntry::new(75.0, 148.0, 60.0, 6.0, ApprovedDate),
            OverlayEntry::new(75.0, 156.0, 60.0, 6.0, ExpirationDate),
            OverlayEntry::new(75.0, 164.0, 60.0, 6.0, Fees),
            OverlayEntry::new(75.0, 172.0, 60.0, 6.0, ReceiptNumber),
        ],
        PermitCategory::Building => vec![
            plate,
            OverlayEntry::new(75.0, 88.0, 60.0, 6.0, Id),
            OverlayEntry::new(75.0, 96.0, 115.0, 6.0, ApplicantName).bold().sized(11.0),
            OverlayEntry::new(75.0, 104.0, 115.0, 6.0, BusinessName),
            OverlayEntry::new(75.0, 112.0, 115.0, 6.0, Address),
            OverlayEntry::new(75.0, 120.0, 115.0, 6.0, ApplicationType),
            OverlayEntry::new(75.0, 140.0, 60.0, 6.0, ApprovedDate),
            OverlayEntry::new(75.0, 148.0, 60.0, 6.0, ExpirationDate),
            OverlayEntry::new(75.0, 156.0, 60.0, 6.0, Fees),
            OverlayEntry::new(75.0, 164.0, 60.0, 6.0, ReceiptNumber),
            OverlayEntry::new(20.0, 180.0, 170.0, 6.0, Remarks),
        ],
        PermitCategory::Barangay => vec![
            plate,
            OverlayEntry::new(20.0, 96.0, 170.0, 7.0, ApplicantName)
                .bold()
                .centered()
                .sized(12.0),
            OverlayEntry::new(20.0, 104.0, 170.0, 6.0, Address).centered(),
            OverlayEntry::new(75.0, 124.0, 60.0, 6.0, Id),
            OverlayEntry::new(75.0, 132.0, 115.0, 6.0, ApplicationType),
            OverlayEntry::new(75.0, 140.0, 60.0, 6.0, ApprovedDate),
            OverlayEntry::new(75.0, 148.0, 60.0, 6.0, ExpirationDate),
            OverlayEntry::new(75.0, 156.0, 60.0, 6.0, Fees),
            OverlayEntry::new(75.0, 164.0, 60.0, 6.0, ReceiptNumber),
        ],
    }
}
