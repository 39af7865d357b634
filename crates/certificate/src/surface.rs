//! Per-document render surface
//!
//! A [`RenderSurface`] owns one single-page [`PdfDocument`] for the duration
//! of a generation call. Callers work in millimetres from the top-left corner;
//! conversion to PDF points happens here and nowhere else.

use crate::{DocumentGeometry, Result};
use log::debug;
use pdf_core::{
    mm_to_pt, pt_to_mm, wrap_to_width, Align, Color, FontFamily, FontWeight,
    ImageScaleMode, ImageXObject, PdfDocument, RectStyle, StandardFont, Stroke, TextStyle,
};
use serde::{Deserialize, Serialize};

/// Family registered on every surface
const STANDARD_FAMILY: &str = "helvetica";

/// The only page a certificate has
const PAGE: usize = 1;

/// What the surface can draw, resolved once when it is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceCapabilities {
    /// Text along a rotated baseline
    pub rotated_text: bool,
}

impl Default for SurfaceCapabilities {
    fn default() -> Self {
        Self { rotated_text: true }
    }
}

/// Current font and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintState {
    pub bold: bool,
    /// Font size in points
    pub size: f32,
    pub color: Color,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            bold: false,
            size: 10.0,
            color: Color::black(),
        }
    }
}

/// Drawing target for one certificate
pub struct RenderSurface {
    doc: PdfDocument,
    geometry: DocumentGeometry,
    capabilities: SurfaceCapabilities,
    paint: PaintState,
    family: String,
}

impl RenderSurface {
    fn wrap(mut doc: PdfDocument, geometry: DocumentGeometry, capabilities: SurfaceCapabilities) -> Result<Self> {
        doc.register_standard_family(STANDARD_FAMILY, StandardFont::Helvetica, StandardFont::HelveticaBold)?;

        let paint = PaintState {
            color: geometry.palette.dark.to_color(),
            ..PaintState::default()
        };

        Ok(Self {
            doc,
            geometry,
            capabilities,
            paint,
            family: STANDARD_FAMILY.to_string(),
        })
    }

    /// Blank page sized by `geometry`
    pub fn begin(geometry: DocumentGeometry, capabilities: SurfaceCapabilities) -> Result<Self> {
        let doc = PdfDocument::new(mm_to_pt(geometry.page_width), mm_to_pt(geometry.page_height))?;
        debug!(
            "Render surface created ({} x {} mm, rotated text: {})",
            geometry.page_width, geometry.page_height, capabilities.rotated_text
        );
        Self::wrap(doc, geometry, capabilities)
    }

    /// Draw on the first page of an existing PDF
    ///
    /// The page size is taken from the template; margin and palette come from
    /// `geometry`.
    pub fn on_template_pdf(
        data: &[u8],
        geometry: &DocumentGeometry,
        capabilities: SurfaceCapabilities,
    ) -> Result<Self> {
        let doc = PdfDocument::open_from_bytes(data)?;
        let (width, height) = doc.page_size(PAGE)?;
        let geometry = geometry.with_page_size(pt_to_mm(width), pt_to_mm(height));
        debug!(
            "Render surface opened on template PDF ({:.1} x {:.1} mm)",
            geometry.page_width, geometry.page_height
        );
        Self::wrap(doc, geometry, capabilities)
    }

    /// Blank page with `background` stretched over it
    pub fn on_template_image(
        background: &ImageXObject,
        geometry: DocumentGeometry,
        capabilities: SurfaceCapabilities,
    ) -> Result<Self> {
        let mut surface = Self::begin(geometry, capabilities)?;
        let (width, height) = (surface.geometry.page_width, surface.geometry.page_height);
        surface.image(background, 0.0, 0.0, width, height)?;
        Ok(surface)
    }

    /// Switch text to an embedded TrueType family
    ///
    /// `family` is usually a clone of one parsed when the engine was built.
    pub fn use_font_family(&mut self, name: &str, family: FontFamily) -> Result<()> {
        self.doc.add_font_family(name, family)?;
        self.family = name.to_string();
        Ok(())
    }

    pub fn geometry(&self) -> &DocumentGeometry {
        &self.geometry
    }

    pub fn capabilities(&self) -> SurfaceCapabilities {
        self.capabilities
    }

    pub fn paint(&self) -> PaintState {
        self.paint
    }

    /// Set weight and size (points) for subsequent text
    pub fn set_font(&mut self, bold: bool, size: f32) {
        self.paint.bold = bold;
        self.paint.size = size;
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.paint.color = color;
    }

    fn text_style(&self) -> TextStyle {
        let weight = if self.paint.bold {
            FontWeight::Bold
        } else {
            FontWeight::Regular
        };
        TextStyle::new(&self.family, self.paint.size)
            .with_weight(weight)
            .with_color(self.paint.color)
    }

    /// Width of `text` in millimetres with the current font
    pub fn text_width(&self, text: &str) -> Result<f64> {
        Ok(pt_to_mm(self.doc.text_width(text, &self.text_style())?))
    }

    /// Word-wrap `text` to `max_width` millimetres with the current font
    pub fn wrap_text(&self, text: &str, max_width: f64) -> Vec<String> {
        let style = self.text_style();
        let max_width_pt = mm_to_pt(max_width);
        wrap_to_width(text, max_width_pt, |candidate| {
            self.doc.text_width(candidate, &style).unwrap_or(0.0)
        })
    }

    /// Draw text with its baseline at `y`
    pub fn text(&mut self, text: &str, x: f64, y: f64, align: Align) -> Result<()> {
        let style = self.text_style();
        self.doc
            .insert_text(text, PAGE, mm_to_pt(x), mm_to_pt(y), align, &style)?;
        Ok(())
    }

    /// Draw text rotated counter-clockwise by `angle` degrees about (x, y)
    ///
    /// Callers check [`SurfaceCapabilities::rotated_text`] first.
    pub fn text_rotated(&mut self, text: &str, x: f64, y: f64, angle: f64, align: Align) -> Result<()> {
        let style = self.text_style();
        self.doc
            .insert_text_rotated(text, PAGE, mm_to_pt(x), mm_to_pt(y), angle, align, &style)?;
        Ok(())
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) -> Result<()> {
        self.rect(x, y, width, height, &RectStyle::filled(color))
    }

    /// Outline a rectangle; `line_width` in millimetres
    pub fn stroke_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
        line_width: f64,
    ) -> Result<()> {
        self.rect(x, y, width, height, &RectStyle::stroked(color, mm_to_pt(line_width)))
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, style: &RectStyle) -> Result<()> {
        self.doc.draw_rect(
            PAGE,
            mm_to_pt(x),
            mm_to_pt(y),
            mm_to_pt(width),
            mm_to_pt(height),
            style,
        )?;
        Ok(())
    }

    /// Straight line; `line_width` in millimetres
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, line_width: f64) -> Result<()> {
        self.doc.draw_line(
            PAGE,
            (mm_to_pt(from.0), mm_to_pt(from.1)),
            (mm_to_pt(to.0), mm_to_pt(to.1)),
            &Stroke::new(color, mm_to_pt(line_width)),
        )?;
        Ok(())
    }

    /// Place an image stretched to the given box
    pub fn image(&mut self, image: &ImageXObject, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.place_image(image, (x, y, width, height), ImageScaleMode::Stretch)
    }

    /// Place an image inside the given box, keeping its aspect ratio
    ///
    /// The image is anchored at the box's top-left corner.
    pub fn image_fitted(&mut self, image: &ImageXObject, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.place_image(image, (x, y, width, height), ImageScaleMode::FitBox)
    }

    fn place_image(&mut self, image: &ImageXObject, rect: (f64, f64, f64, f64), mode: ImageScaleMode) -> Result<()> {
        let (x, y, width, height) = rect;
        self.doc.insert_image(
            image,
            PAGE,
            mm_to_pt(x),
            mm_to_pt(y),
            mm_to_pt(width),
            mm_to_pt(height),
            mode,
        )?;
        Ok(())
    }

    /// Serialize the finished certificate
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.doc.into_bytes()?)
    }
}
