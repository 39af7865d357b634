//! Drawing primitives
//!
//! Flow primitives take the layout cursor `y` (millimetres from the top) and
//! return the cursor for whatever comes next. The returned value is never
//! smaller than `y`, whatever the input text. Fixed-position primitives
//! (border, watermark, plate, footer) ignore the cursor entirely.

use crate::{RenderSurface, Result};
use log::warn;
use pdf_core::{Align, ImageXObject};
use permit_format::{plate_number, NOT_AVAILABLE};
use serde::{Deserialize, Serialize};

pub const OUTER_BORDER_INSET: f64 = 8.0;
pub const INNER_BORDER_INSET: f64 = 10.0;

pub const WATERMARK_FONT_SIZE: f32 = 60.0;
pub const WATERMARK_ANGLE: f64 = 45.0;
/// Vertical offset of each fallback watermark line from the page centre
pub const WATERMARK_FALLBACK_OFFSET: f64 = 15.0;

pub const PLATE_WIDTH: f64 = 38.0;
pub const PLATE_HEIGHT: f64 = 16.0;

pub const LOGO_SIZE: f64 = 20.0;
pub const HEADER_TRAILING_MARGIN: f64 = 4.0;

pub const TITLE_FONT_SIZE: f32 = 18.0;
pub const TITLE_RULE_PADDING: f64 = 10.0;
pub const TITLE_ADVANCE: f64 = 10.0;

pub const SUBTITLE_FONT_SIZE: f32 = 11.0;
pub const SUBTITLE_ADVANCE: f64 = 7.0;

pub const SECTION_BAND_HEIGHT: f64 = 8.0;
pub const SECTION_MARGIN: f64 = 4.0;

pub const ROW_FONT_SIZE: f32 = 10.0;
pub const ROW_HEIGHT: f64 = 7.0;
/// Label column, relative to the left margin
pub const LABEL_OFFSET: f64 = 5.0;
/// Value column, relative to the left margin
pub const VALUE_OFFSET: f64 = 60.0;

pub const BADGE_WIDTH: f64 = 30.0;
pub const BADGE_HEIGHT: f64 = 6.0;
pub const NOTICE_FONT_SIZE: f32 = 9.0;
pub const NOTICE_LINE_HEIGHT: f64 = 4.5;
pub const NOTICE_PADDING: f64 = 3.0;
pub const NOTICE_MARGIN: f64 = 5.0;

pub const SIGNATURE_BLOCK_HEIGHT: f64 = 35.0;
pub const SIGNATURE_RULE_OFFSET: f64 = 20.0;
pub const SIGNATURE_RULE_HALF_WIDTH: f64 = 30.0;

pub const FOOTER_FONT_SIZE: f32 = 7.0;

pub const OVERLAY_PADDING: f64 = 1.5;

pub const BANNER_FONT_SIZE: f32 = 11.0;
pub const BANNER_ADVANCE: f64 = 8.0;

pub const PARAGRAPH_FONT_SIZE: f32 = 10.0;
pub const PARAGRAPH_LINE_HEIGHT: f64 = 5.0;
pub const PARAGRAPH_MARGIN: f64 = 3.0;

/// One centred line of the header block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionLine {
    pub text: String,
    pub font_size: f32,
    #[serde(default)]
    pub bold: bool,
}

impl CompositionLine {
    pub fn new(text: impl Into<String>, font_size: f32, bold: bool) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold,
        }
    }

    /// Vertical space taken by this line
    pub fn advance(&self) -> f64 {
        self.font_size as f64 * 0.5 + 1.0
    }
}

/// A signature column: printed name above the signer's title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub name: String,
    pub title: String,
}

impl Signer {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
        }
    }
}

/// Optional logos either side of the header text
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderLogos<'a> {
    pub left: Option<&'a ImageXObject>,
    pub right: Option<&'a ImageXObject>,
}

/// Alignment of overlay text inside its box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayAlign {
    #[default]
    Left,
    Center,
}

/// Text options for an overlay patch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchText {
    pub font_size: f32,
    pub bold: bool,
    pub align: OverlayAlign,
    pub color: pdf_core::Color,
}

fn value_or_na(value: Option<&str>) -> &str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

/// Double-rule frame: thick outer, thin inner
pub fn border(surface: &mut RenderSurface) -> Result<()> {
    let geometry = surface.geometry().clone();
    let accent = geometry.palette.accent.to_color();

    for (inset, line_width) in [(OUTER_BORDER_INSET, 0.8), (INNER_BORDER_INSET, 0.3)] {
        surface.stroke_rect(
            inset,
            inset,
            geometry.page_width - 2.0 * inset,
            geometry.page_height - 2.0 * inset,
            accent,
            line_width,
        )?;
    }

    Ok(())
}

/// Large diagonal label behind the page content
///
/// Without rotated-text support the label is drawn twice, horizontally,
/// above and below the page centre.
pub fn watermark(surface: &mut RenderSurface, label: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Ok(());
    }

    let (cx, cy) = (surface.geometry().center_x(), surface.geometry().center_y());
    let tint = surface.geometry().palette.watermark.to_color();

    surface.set_font(true, WATERMARK_FONT_SIZE);
    surface.set_text_color(tint);

    if surface.capabilities().rotated_text {
        surface.text_rotated(label, cx, cy, WATERMARK_ANGLE, Align::Center)?;
    } else {
        warn!("Rotated text unavailable; drawing watermark '{label}' as two horizontal lines");
        surface.text(label, cx, cy - WATERMARK_FALLBACK_OFFSET, Align::Center)?;
        surface.text(label, cx, cy + WATERMARK_FALLBACK_OFFSET, Align::Center)?;
    }

    Ok(())
}

/// Boxed "Plate No." with the 4-digit code in the top-right corner
pub fn identifier_plate(surface: &mut RenderSurface, record_id: &str) -> Result<()> {
    let geometry = surface.geometry().clone();
    let palette = geometry.palette;
    let x = geometry.page_width - geometry.margin - 40.0;
    let y = geometry.margin + 2.0;
    let cx = x + PLATE_WIDTH / 2.0;

    surface.fill_rect(x, y, PLATE_WIDTH, PLATE_HEIGHT, palette.white.to_color())?;
    surface.stroke_rect(x, y, PLATE_WIDTH, PLATE_HEIGHT, palette.accent.to_color(), 0.5)?;

    surface.set_font(false, 7.0);
    surface.set_text_color(palette.gray.to_color());
    surface.text("Plate No.", cx, y + 5.0, Align::Center)?;

    surface.set_font(true, 14.0);
    surface.set_text_color(palette.accent.to_color());
    surface.text(&plate_number(record_id), cx, y + 13.0, Align::Center)?;

    Ok(())
}

/// Logos and centred issuer lines
pub fn header_block(
    surface: &mut RenderSurface,
    logos: HeaderLogos<'_>,
    lines: &[CompositionLine],
    y: f64,
) -> Result<f64> {
    let geometry = surface.geometry().clone();

    if let Some(logo) = logos.left {
        surface.image_fitted(logo, geometry.margin + 5.0, y, LOGO_SIZE, LOGO_SIZE)?;
    }
    if let Some(logo) = logos.right {
        surface.image_fitted(
            logo,
            geometry.page_width - geometry.margin - 5.0 - LOGO_SIZE,
            y,
            LOGO_SIZE,
            LOGO_SIZE,
        )?;
    }

    surface.set_text_color(geometry.palette.dark.to_color());
    let mut cursor = y + 6.0;
    for line in lines {
        surface.set_font(line.bold, line.font_size);
        surface.text(&line.text, geometry.center_x(), cursor, Align::Center)?;
        cursor += line.advance();
    }

    Ok(cursor + HEADER_TRAILING_MARGIN)
}

/// Large bold centred title with a rule underneath
pub fn title(surface: &mut RenderSurface, text: &str, y: f64) -> Result<f64> {
    let geometry = surface.geometry().clone();
    let accent = geometry.palette.accent.to_color();
    let cx = geometry.center_x();

    surface.set_font(true, TITLE_FONT_SIZE);
    surface.set_text_color(accent);
    surface.text(text, cx, y, Align::Center)?;

    let half = (surface.text_width(text)? + TITLE_RULE_PADDING) / 2.0;
    surface.line((cx - half, y + 2.0), (cx + half, y + 2.0), accent, 0.5)?;

    Ok(y + TITLE_ADVANCE)
}

pub fn subtitle(surface: &mut RenderSurface, text: &str, y: f64) -> Result<f64> {
    let geometry = surface.geometry().clone();
    surface.set_font(false, SUBTITLE_FONT_SIZE);
    surface.set_text_color(geometry.palette.dark.to_color());
    surface.text(text, geometry.center_x(), y, Align::Center)?;
    Ok(y + SUBTITLE_ADVANCE)
}

/// Accent band across the content width with a white label
pub fn section_header(surface: &mut RenderSurface, label: &str, y: f64) -> Result<f64> {
    let geometry = surface.geometry().clone();
    let palette = geometry.palette;

    surface.fill_rect(
        geometry.margin,
        y,
        geometry.content_width(),
        SECTION_BAND_HEIGHT,
        palette.accent.to_color(),
    )?;

    surface.set_font(true, ROW_FONT_SIZE);
    surface.set_text_color(palette.white.to_color());
    surface.text(label, geometry.center_x(), y + 5.5, Align::Center)?;

    Ok(y + SECTION_BAND_HEIGHT + SECTION_MARGIN)
}

/// Bold label and plain value on one baseline; blank values print "N/A"
pub fn label_value_row(
    surface: &mut RenderSurface,
    label: &str,
    value: Option<&str>,
    y: f64,
) -> Result<f64> {
    let geometry = surface.geometry().clone();
    surface.set_text_color(geometry.palette.dark.to_color());

    surface.set_font(true, ROW_FONT_SIZE);
    surface.text(label, geometry.margin + LABEL_OFFSET, y, Align::Left)?;

    surface.set_font(false, ROW_FONT_SIZE);
    surface.text(value_or_na(value), geometry.margin + VALUE_OFFSET, y, Align::Left)?;

    Ok(y + ROW_HEIGHT)
}

/// "IMPORTANT" badge followed by a framed, word-wrapped notice
pub fn notice_box(surface: &mut RenderSurface, text: &str, y: f64) -> Result<f64> {
    let geometry = surface.geometry().clone();
    let palette = geometry.palette;

    surface.fill_rect(geometry.margin, y, BADGE_WIDTH, BADGE_HEIGHT, palette.accent.to_color())?;
    surface.set_font(true, 8.0);
    surface.set_text_color(palette.white.to_color());
    surface.text(
        "IMPORTANT",
        geometry.margin + BADGE_WIDTH / 2.0,
        y + 4.2,
        Align::Center,
    )?;

    surface.set_font(false, NOTICE_FONT_SIZE);
    let lines = surface.wrap_text(text, geometry.content_width() - 8.0);
    let box_top = y + BADGE_HEIGHT;
    let box_height = lines.len() as f64 * NOTICE_LINE_HEIGHT + 2.0 * NOTICE_PADDING;

    surface.stroke_rect(
        geometry.margin,
        box_top,
        geometry.content_width(),
        box_height,
        palette.accent.to_color(),
        0.3,
    )?;

    surface.set_text_color(palette.dark.to_color());
    for (i, line) in lines.iter().enumerate() {
        let baseline = box_top + NOTICE_PADDING + (i + 1) as f64 * NOTICE_LINE_HEIGHT - 1.2;
        surface.text(line, geometry.margin + 4.0, baseline, Align::Left)?;
    }

    Ok(y + BADGE_HEIGHT + box_height + NOTICE_MARGIN)
}

/// Equal-width signature columns: rule, name, title
pub fn signature_block(surface: &mut RenderSurface, signers: &[Signer], y: f64) -> Result<f64> {
    if signers.is_empty() {
        return Ok(y + SIGNATURE_BLOCK_HEIGHT);
    }

    let geometry = surface.geometry().clone();
    let palette = geometry.palette;
    let column_width = geometry.content_width() / signers.len() as f64;
    let half_rule = SIGNATURE_RULE_HALF_WIDTH.min(column_width / 2.0 - 2.0).max(0.0);
    let rule_y = y + SIGNATURE_RULE_OFFSET;

    for (i, signer) in signers.iter().enumerate() {
        let cx = geometry.margin + column_width * (i as f64 + 0.5);

        surface.line(
            (cx - half_rule, rule_y),
            (cx + half_rule, rule_y),
            palette.dark.to_color(),
            0.3,
        )?;

        surface.set_font(true, 10.0);
        surface.set_text_color(palette.dark.to_color());
        surface.text(&signer.name, cx, rule_y + 5.0, Align::Center)?;

        surface.set_font(false, 9.0);
        surface.set_text_color(palette.gray.to_color());
        surface.text(&signer.title, cx, rule_y + 10.0, Align::Center)?;
    }

    Ok(y + SIGNATURE_BLOCK_HEIGHT)
}

/// Rule and up to three small gray lines pinned to the page bottom
///
/// Blank lines are skipped; the remaining ones keep their slots.
pub fn footer_stamp(
    surface: &mut RenderSurface,
    disclaimer: &str,
    reference: &str,
    attribution: &str,
) -> Result<()> {
    let geometry = surface.geometry().clone();
    let gray = geometry.palette.gray.to_color();
    let bottom = geometry.page_height - geometry.margin;

    surface.line(
        (geometry.margin, bottom - 14.0),
        (geometry.page_width - geometry.margin, bottom - 14.0),
        gray,
        0.2,
    )?;

    surface.set_font(false, FOOTER_FONT_SIZE);
    surface.set_text_color(gray);
    for (text, offset) in [(disclaimer, 10.0), (reference, 6.0), (attribution, 2.0)] {
        if !text.trim().is_empty() {
            surface.text(text, geometry.center_x(), bottom - offset, Align::Center)?;
        }
    }

    Ok(())
}

/// Erase a box of the background and print a value inside it
///
/// The baseline sits `OVERLAY_PADDING` above the bottom edge; left-aligned
/// text starts `OVERLAY_PADDING` in from the left edge.
#[allow(clippy::too_many_arguments)]
pub fn overlay_patch(
    surface: &mut RenderSurface,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    text: Option<&str>,
    opts: &PatchText,
) -> Result<f64> {
    let white = surface.geometry().palette.white.to_color();
    surface.fill_rect(x, y, width, height, white)?;

    surface.set_font(opts.bold, opts.font_size);
    surface.set_text_color(opts.color);

    let baseline = y + height - OVERLAY_PADDING;
    let (anchor, align) = match opts.align {
        OverlayAlign::Left => (x + OVERLAY_PADDING, Align::Left),
        OverlayAlign::Center => (x + width / 2.0, Align::Center),
    };
    surface.text(value_or_na(text), anchor, baseline, align)?;

    Ok(y + height.max(0.0))
}

/// Bold lead-in line such as "TO WHOM IT MAY CONCERN:"
pub fn banner(surface: &mut RenderSurface, text: &str, y: f64) -> Result<f64> {
    let geometry = surface.geometry().clone();
    surface.set_font(true, BANNER_FONT_SIZE);
    surface.set_text_color(geometry.palette.dark.to_color());
    surface.text(text, geometry.margin + LABEL_OFFSET, y, Align::Left)?;
    Ok(y + BANNER_ADVANCE)
}

/// Body text wrapped to the content width
pub fn paragraph(surface: &mut RenderSurface, text: &str, y: f64) -> Result<f64> {
    let geometry = surface.geometry().clone();
    surface.set_font(false, PARAGRAPH_FONT_SIZE);
    surface.set_text_color(geometry.palette.dark.to_color());

    let lines = surface.wrap_text(text, geometry.content_width() - 2.0 * LABEL_OFFSET);
    for (i, line) in lines.iter().enumerate() {
        surface.text(
            line,
            geometry.margin + LABEL_OFFSET,
            y + i as f64 * PARAGRAPH_LINE_HEIGHT,
            Align::Left,
        )?;
    }

    Ok(y + lines.len() as f64 * PARAGRAPH_LINE_HEIGHT + PARAGRAPH_MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentGeometry, SurfaceCapabilities};
    use pdf_core::Color;

    fn surface() -> RenderSurface {
        RenderSurface::begin(DocumentGeometry::default(), SurfaceCapabilities::default()).unwrap()
    }

    fn patch_text() -> PatchText {
        PatchText {
            font_size: 9.0,
            bold: false,
            align: OverlayAlign::Left,
            color: Color::black(),
        }
    }

    #[test]
    fn test_flow_primitives_never_move_up() {
        let mut s = surface();
        let long = "word ".repeat(80);

        for y in [0.0, 42.5, 250.0] {
            for text in ["", " ", "Short", long.as_str()] {
                assert!(header_block(&mut s, HeaderLogos::default(), &[], y).unwrap() >= y);
                assert!(
                    header_block(&mut s, HeaderLogos::default(), &[CompositionLine::new(text, 12.0, true)], y)
                        .unwrap()
                        >= y
                );
                assert!(title(&mut s, text, y).unwrap() >= y);
                assert!(subtitle(&mut s, text, y).unwrap() >= y);
                assert!(section_header(&mut s, text, y).unwrap() >= y);
                assert!(label_value_row(&mut s, text, Some(text), y).unwrap() >= y);
                assert!(label_value_row(&mut s, text, None, y).unwrap() >= y);
                assert!(notice_box(&mut s, text, y).unwrap() >= y);
                assert!(signature_block(&mut s, &[], y).unwrap() >= y);
                assert!(signature_block(&mut s, &[Signer::new(text, text)], y).unwrap() >= y);
                assert!(banner(&mut s, text, y).unwrap() >= y);
                assert!(paragraph(&mut s, text, y).unwrap() >= y);
                assert!(overlay_patch(&mut s, 10.0, y, 0.0, 0.0, Some(text), &patch_text()).unwrap() >= y);
            }
        }
    }

    #[test]
    fn test_fixed_advances() {
        let mut s = surface();
        assert_eq!(title(&mut s, "Business Permit", 50.0).unwrap(), 60.0);
        assert_eq!(subtitle(&mut s, "Sub", 50.0).unwrap(), 57.0);
        assert_eq!(section_header(&mut s, "DETAILS", 50.0).unwrap(), 62.0);
        assert_eq!(label_value_row(&mut s, "Name:", None, 50.0).unwrap(), 57.0);
        assert_eq!(signature_block(&mut s, &[], 50.0).unwrap(), 85.0);
        assert_eq!(
            signature_block(&mut s, &[Signer::new("A", "B"), Signer::new("C", "D")], 50.0).unwrap(),
            85.0
        );
        assert_eq!(banner(&mut s, "TO WHOM IT MAY CONCERN:", 50.0).unwrap(), 58.0);
    }

    #[test]
    fn test_header_block_advance() {
        let mut s = surface();
        let lines = [
            CompositionLine::new("Republic of the Philippines", 10.0, false),
            CompositionLine::new("CITY GOVERNMENT", 14.0, true),
        ];
        // 6 + (10*0.5+1) + (14*0.5+1) + 4
        assert_eq!(header_block(&mut s, HeaderLogos::default(), &lines, 20.0).unwrap(), 44.0);
    }

    #[test]
    fn test_wide_logo_keeps_aspect_ratio() {
        let png = {
            let img = image::RgbImage::from_pixel(40, 20, image::Rgb([0, 51, 102]));
            let mut bytes = Vec::new();
            image::DynamicImage::ImageRgb8(img)
                .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
                .unwrap();
            bytes
        };
        let logo = ImageXObject::decode(&png).unwrap();
        let logos = HeaderLogos {
            left: Some(&logo),
            right: None,
        };

        let mut s = surface();
        header_block(&mut s, logos, &[], 20.0).unwrap();

        let doc = lopdf::Document::load_mem(&s.finish().unwrap()).unwrap();
        let page_id = doc.get_pages()[&1];
        let content = String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned();
        let placement: Vec<f64> = content
            .lines()
            .find(|line| line.ends_with(" cm"))
            .unwrap()
            .split_whitespace()
            .take(4)
            .map(|v| v.parse().unwrap())
            .collect();

        // [w 0 0 h]: full box width, half its height
        assert!((placement[0] - pdf_core::mm_to_pt(LOGO_SIZE)).abs() < 1e-6);
        assert!((placement[0] / placement[3] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_notice_box_grows_with_text() {
        let mut s = surface();
        let short = notice_box(&mut s, "Display this permit.", 100.0).unwrap();
        let long = notice_box(&mut s, &"Display this permit conspicuously. ".repeat(12), 100.0).unwrap();
        // one line: badge + (4.5 + 6) + margin
        assert_eq!(short, 100.0 + 6.0 + 10.5 + 5.0);
        assert!(long > short);
    }

    #[test]
    fn test_empty_notice_still_reserves_a_line() {
        let mut s = surface();
        assert_eq!(notice_box(&mut s, "", 0.0).unwrap(), 6.0 + 10.5 + 5.0);
    }

    #[test]
    fn test_paragraph_advance() {
        let mut s = surface();
        assert_eq!(paragraph(&mut s, "One line.", 10.0).unwrap(), 10.0 + 5.0 + 3.0);
    }

    #[test]
    fn test_value_or_na() {
        assert_eq!(value_or_na(None), "N/A");
        assert_eq!(value_or_na(Some("")), "N/A");
        assert_eq!(value_or_na(Some("  ")), "N/A");
        assert_eq!(value_or_na(Some(" Value ")), "Value");
    }

    #[test]
    fn test_fixed_primitives_leave_paint_state_set() {
        let mut s = surface();
        border(&mut s).unwrap();
        watermark(&mut s, "BUSINESS PERMIT").unwrap();
        identifier_plate(&mut s, "BUS20240001").unwrap();
        footer_stamp(&mut s, "Disclaimer", "Ref", "").unwrap();

        let paint = s.paint();
        assert_eq!(paint.size, FOOTER_FONT_SIZE);
        assert!(!paint.bold);
    }

    #[test]
    fn test_composition_line_serde_default_bold() {
        let line: CompositionLine =
            serde_json::from_str(r#"{"text": "City of Example", "font_size": 12}"#).unwrap();
        assert!(!line.bold);
        assert_eq!(line.advance(), 7.0);
    }
}
