//! PDF Document wrapper

use crate::font::FontObjects;
use crate::graphics::{generate_line_operators, generate_rect_operators, RectStyle, Stroke};
use crate::image::{calculate_scaled_dimensions, generate_image_operators, ImageScaleMode, ImageXObject};
use crate::text::{generate_text_operators, TextRenderContext};
use crate::{Align, FontData, FontFamily, FontFamilyBuilder, FontWeight, PdfError, Result, StandardFont};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeMap, HashMap};

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Explicit paint state for a single text insertion
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Registered font family name
    pub family: String,
    pub weight: FontWeight,
    /// Font size in points
    pub size: f32,
    pub color: Color,
}

impl TextStyle {
    pub fn new(family: &str, size: f32) -> Self {
        Self {
            family: family.to_string(),
            weight: FontWeight::Regular,
            size,
            color: Color::default(),
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Page box in PDF user space: (llx, lly, urx, ury)
type PageBox = (f64, f64, f64, f64);

/// PDF Document wrapper providing high-level drawing operations
///
/// Coordinates passed to drawing methods are in points from the top-left
/// corner of the page. Content is buffered per page and written once when the
/// document is serialized.
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Registered font families
    font_families: HashMap<String, FontFamily>,
    /// Embedded fonts (variant name -> PDF object ID)
    embedded_fonts: HashMap<String, ObjectId>,
    /// Page font resources (page number -> variant name -> resource name)
    page_font_resources: BTreeMap<usize, BTreeMap<String, String>>,
    next_font_resource: u32,
    /// Embedded images (content hash -> PDF object ID)
    embedded_images: HashMap<u64, ObjectId>,
    /// Page image resources (page number -> resource name -> object ID)
    page_image_resources: BTreeMap<usize, BTreeMap<String, ObjectId>>,
    next_image_resource: u32,
    /// Buffered content operators per page
    page_content_buffer: BTreeMap<usize, Vec<u8>>,
}

impl PdfDocument {
    fn from_inner(inner: Document) -> Self {
        Self {
            inner,
            font_families: HashMap::new(),
            embedded_fonts: HashMap::new(),
            page_font_resources: BTreeMap::new(),
            next_font_resource: 1,
            embedded_images: HashMap::new(),
            page_image_resources: BTreeMap::new(),
            next_image_resource: 1,
            page_content_buffer: BTreeMap::new(),
        }
    }

    /// Create a document with a single blank page
    ///
    /// # Arguments
    /// * `width` - Page width in points
    /// * `height` - Page height in points
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(PdfError::InvalidPageSize(width, height));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let contents_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => Dictionary::new(),
            "Contents" => contents_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(Self::from_inner(doc))
    }

    /// Open a PDF document from bytes (used for pre-printed templates)
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::from_inner(inner))
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Get page (width, height) in points
    pub fn page_size(&self, page: usize) -> Result<(f64, f64)> {
        let (llx, lly, urx, ury) = self.page_box(page)?;
        Ok((urx - llx, ury - lly))
    }

    /// Register a family backed by the standard PDF fonts
    pub fn register_standard_family(
        &mut self,
        name: &str,
        regular: StandardFont,
        bold: StandardFont,
    ) -> Result<()> {
        self.add_font_family(
            name,
            FontFamily {
                regular: Some(FontData::standard(name, regular)),
                bold: Some(FontData::standard(&format!("{name}-bold"), bold)),
            },
        )
    }

    /// Register an embedded TrueType font family
    ///
    /// # Example
    /// ```ignore
    /// doc.register_font_family("notosans",
    ///     FontFamilyBuilder::new()
    ///         .regular(std::fs::read("NotoSans-Regular.ttf")?)
    ///         .bold(std::fs::read("NotoSans-Bold.ttf")?)
    /// )?;
    /// ```
    pub fn register_font_family(&mut self, name: &str, builder: FontFamilyBuilder) -> Result<()> {
        let family = builder.build(name)?;
        self.add_font_family(name, family)
    }

    /// Register a family that was built ahead of time
    ///
    /// Cloning a [`FontFamily`] shares its font bytes, so a family parsed
    /// once can be handed to any number of documents.
    pub fn add_font_family(&mut self, name: &str, family: FontFamily) -> Result<()> {
        if self.font_families.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }
        self.font_families.insert(name.to_string(), family);
        Ok(())
    }

    fn resolve_font(&self, style: &TextStyle) -> Result<&FontData> {
        self.font_families
            .get(&style.family)
            .and_then(|family| family.get_variant(style.weight))
            .ok_or_else(|| PdfError::FontNotFound(style.family.clone()))
    }

    fn resolve_font_mut(&mut self, style: &TextStyle) -> Result<&mut FontData> {
        self.font_families
            .get_mut(&style.family)
            .and_then(|family| family.get_variant_mut(style.weight))
            .ok_or_else(|| PdfError::FontNotFound(style.family.clone()))
    }

    /// Width of `text` in points for the given style
    pub fn text_width(&self, text: &str, style: &TextStyle) -> Result<f64> {
        let font = self.resolve_font(style)?;
        Ok(font.text_width_points(text, style.size) as f64)
    }

    /// Insert text at a specific position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Baseline Y coordinate in points (from top)
    /// * `align` - Alignment relative to `x`
    /// * `style` - Font, size and color
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
        style: &TextStyle,
    ) -> Result<()> {
        self.insert_text_rotated(text, page, x, y, 0.0, align, style)
    }

    /// Insert text rotated counter-clockwise by `angle` degrees around its anchor
    #[allow(clippy::too_many_arguments)]
    pub fn insert_text_rotated(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        angle: f64,
        align: Align,
        style: &TextStyle,
    ) -> Result<()> {
        let (llx, _, _, ury) = self.page_box(page)?;

        // Skip empty text - nothing to render
        if text.is_empty() {
            return Ok(());
        }

        let (variant_name, text_hex, text_width) = {
            let font = self.resolve_font_mut(style)?;
            font.add_chars(text);
            (
                font.name.clone(),
                font.encode_text_hex(text),
                font.text_width_points(text, style.size) as f64,
            )
        };

        let font_resource_name = self.get_or_create_font_ref(&variant_name, page);

        let ctx = TextRenderContext {
            font_name: font_resource_name,
            font_size: style.size,
            text_width,
            color: style.color,
            rotation: angle,
        };

        let operators = generate_text_operators(&text_hex, llx + x, ury - y, align, &ctx);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Draw a rectangle whose top-left corner is at (x, y)
    pub fn draw_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: &RectStyle,
    ) -> Result<()> {
        let (llx, _, _, ury) = self.page_box(page)?;
        let operators = generate_rect_operators(llx + x, ury - y - height, width, height, style);
        self.buffer_content(page, &operators);
        Ok(())
    }

    /// Draw a straight line between two points
    pub fn draw_line(
        &mut self,
        page: usize,
        from: (f64, f64),
        to: (f64, f64),
        stroke: &Stroke,
    ) -> Result<()> {
        let (llx, _, _, ury) = self.page_box(page)?;
        let operators = generate_line_operators(
            llx + from.0,
            ury - from.1,
            llx + to.0,
            ury - to.1,
            stroke,
        );
        self.buffer_content(page, &operators);
        Ok(())
    }

    /// Insert a decoded image with its top-left corner at (x, y)
    #[allow(clippy::too_many_arguments)]
    pub fn insert_image(
        &mut self,
        image: &ImageXObject,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<()> {
        let (llx, _, _, ury) = self.page_box(page)?;

        let image_resource_name = self.get_or_create_image_ref(image, page)?;

        let (actual_width, actual_height) =
            calculate_scaled_dimensions(image.width, image.height, width, height, mode);

        let operators = generate_image_operators(
            &image_resource_name,
            llx + x,
            ury - y - actual_height,
            actual_width,
            actual_height,
        );
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Serialize the document, writing buffered content and font resources
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        self.flush_content_buffers()?;
        self.embed_fonts()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        pages
            .get(&(page as u32))
            .copied()
            .ok_or(PdfError::InvalidPage(page, pages.len()))
    }

    /// Resolve a direct or referenced dictionary, cloning it
    fn resolve_dict(&self, object: &Object) -> Option<Dictionary> {
        match object {
            Object::Dictionary(dict) => Some(dict.clone()),
            Object::Reference(id) => self
                .inner
                .get_object(*id)
                .ok()
                .and_then(|o| o.as_dict().ok())
                .cloned(),
            _ => None,
        }
    }

    /// Get the MediaBox (or CropBox) of a page, following parent inheritance
    fn page_box(&self, page: usize) -> Result<PageBox> {
        let mut current_id = self.page_id(page)?;

        // Follow the parent chain with a safety limit
        for _ in 0..10 {
            let dict = self
                .inner
                .get_object(current_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

            if let Ok(media_box) = dict.get(b"MediaBox").or_else(|_| dict.get(b"CropBox")) {
                let values = match media_box {
                    Object::Array(arr) => arr.clone(),
                    Object::Reference(id) => self
                        .inner
                        .get_object(*id)?
                        .as_array()
                        .map_err(|_| {
                            PdfError::ParseError("MediaBox reference is not an array".to_string())
                        })?
                        .clone(),
                    _ => return Err(PdfError::ParseError("MediaBox is not an array".to_string())),
                };
                return parse_page_box(&values);
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }

        // Fallback: assume A4 page size
        Ok((0.0, 0.0, 595.28, 841.89))
    }

    /// Get or create a font resource name for a page
    ///
    /// The font object itself is embedded at save time, once every used
    /// character is known.
    fn get_or_create_font_ref(&mut self, variant_name: &str, page: usize) -> String {
        let page_resources = self.page_font_resources.entry(page).or_default();

        if let Some(resource_name) = page_resources.get(variant_name) {
            return resource_name.clone();
        }

        // Prefixed so template fonts named /F1 etc. are never shadowed
        let resource_name = format!("CF{}", self.next_font_resource);
        self.next_font_resource += 1;
        page_resources.insert(variant_name.to_string(), resource_name.clone());

        resource_name
    }

    /// Embed every used font and register it on the pages that reference it
    fn embed_fonts(&mut self) -> Result<()> {
        let mut family_names: Vec<&String> = self.font_families.keys().collect();
        family_names.sort();

        let mut used: Vec<FontData> = Vec::new();
        for name in family_names {
            for variant in self.font_families[name].variants() {
                if !variant.used_chars.is_empty() {
                    used.push(variant.clone());
                }
            }
        }

        for font in &used {
            let object_id = self.embed_font_object(font)?;
            self.embedded_fonts.insert(font.name.clone(), object_id);
        }

        let page_resources: Vec<(usize, Vec<(String, String)>)> = self
            .page_font_resources
            .iter()
            .map(|(&page, fonts)| {
                (
                    page,
                    fonts.iter().map(|(f, r)| (f.clone(), r.clone())).collect(),
                )
            })
            .collect();

        for (page, fonts) in page_resources {
            let mut entries = Vec::with_capacity(fonts.len());
            for (font_name, resource_name) in fonts {
                let font_ref = *self
                    .embedded_fonts
                    .get(&font_name)
                    .ok_or_else(|| PdfError::FontNotFound(font_name.clone()))?;
                entries.push((resource_name, font_ref));
            }
            self.add_page_resources(page, b"Font", &entries)?;
        }

        Ok(())
    }

    /// Add the objects for a single font and return the font dictionary's ID
    fn embed_font_object(&mut self, font: &FontData) -> Result<ObjectId> {
        match font.to_pdf_objects()? {
            FontObjects::Simple(dict) => Ok(self.inner.add_object(dict)),
            FontObjects::Composite {
                mut type0_font,
                mut cid_font,
                mut font_descriptor,
                font_file_stream,
                tounicode_stream,
            } => {
                let font_file_id = self.inner.add_object(font_file_stream);
                font_descriptor.set("FontFile2", Object::Reference(font_file_id));
                let font_descriptor_id = self.inner.add_object(font_descriptor);

                cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
                let cid_font_id = self.inner.add_object(cid_font);

                let tounicode_id = self.inner.add_object(tounicode_stream);
                type0_font.set(
                    "DescendantFonts",
                    Object::Array(vec![Object::Reference(cid_font_id)]),
                );
                type0_font.set("ToUnicode", Object::Reference(tounicode_id));

                Ok(self.inner.add_object(type0_font))
            }
        }
    }

    /// Get or create an image resource name for a page
    ///
    /// Images are embedded once per document, keyed by content hash.
    fn get_or_create_image_ref(&mut self, image: &ImageXObject, page: usize) -> Result<String> {
        let hash = image.content_hash();
        let object_id = match self.embedded_images.get(&hash) {
            Some(id) => *id,
            None => {
                let id = self.inner.add_object(image.to_pdf_stream());
                self.embedded_images.insert(hash, id);
                id
            }
        };

        let page_resources = self.page_image_resources.entry(page).or_default();
        if let Some((name, _)) = page_resources.iter().find(|(_, id)| **id == object_id) {
            return Ok(name.clone());
        }

        let resource_name = format!("CIm{}", self.next_image_resource);
        self.next_image_resource += 1;
        page_resources.insert(resource_name.clone(), object_id);

        self.add_page_resources(page, b"XObject", &[(resource_name.clone(), object_id)])?;

        Ok(resource_name)
    }

    /// Merge named references into a page's Resources sub-dictionary
    ///
    /// Referenced Resources and sub-dictionaries (common in template PDFs)
    /// are resolved and written back inline.
    fn add_page_resources(
        &mut self,
        page: usize,
        category: &[u8],
        entries: &[(String, ObjectId)],
    ) -> Result<()> {
        let page_id = self.page_id(page)?;
        let mut page_dict = self
            .inner
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PdfError::SaveError("Page object is not a dictionary".to_string()))?
            .clone();

        let mut resources = page_dict
            .get(b"Resources")
            .ok()
            .and_then(|r| self.resolve_dict(r))
            .unwrap_or_default();

        let mut sub_dict = resources
            .get(category)
            .ok()
            .and_then(|d| self.resolve_dict(d))
            .unwrap_or_default();

        for (name, object_id) in entries {
            sub_dict.set(name.as_bytes(), Object::Reference(*object_id));
        }

        resources.set(category, Object::Dictionary(sub_dict));
        page_dict.set("Resources", Object::Dictionary(resources));
        self.inner.objects.insert(page_id, page_dict.into());

        Ok(())
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Flush all buffered content to page streams
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers = std::mem::take(&mut self.page_content_buffer);

        for (page, content) in buffers {
            if !content.is_empty() {
                self.append_to_content_stream(page, content)?;
            }
        }

        Ok(())
    }

    /// Append content after a page's existing streams
    ///
    /// Existing content is bracketed with q/Q so any graphics state it leaves
    /// behind cannot leak into the appended operators.
    fn append_to_content_stream(&mut self, page: usize, content: Vec<u8>) -> Result<()> {
        let page_id = self.page_id(page)?;
        let mut page_dict = self
            .inner
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?
            .clone();

        let existing: Vec<Object> = match page_dict.get(b"Contents") {
            Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
            Ok(Object::Array(arr)) => arr.clone(),
            Ok(Object::Stream(stream)) => {
                vec![Object::Reference(self.inner.add_object(stream.clone()))]
            }
            _ => Vec::new(),
        };

        let mut contents = Vec::with_capacity(existing.len() + 2);
        if !existing.is_empty() {
            let save_id = self
                .inner
                .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
            contents.push(Object::Reference(save_id));
            contents.extend(existing);
        }

        let mut appended = if contents.is_empty() {
            Vec::new()
        } else {
            b"Q\n".to_vec()
        };
        appended.extend(content);
        let appended_id = self.inner.add_object(Stream::new(Dictionary::new(), appended));
        contents.push(Object::Reference(appended_id));

        page_dict.set("Contents", Object::Array(contents));
        self.inner.objects.insert(page_id, page_dict.into());

        Ok(())
    }
}

/// Read a numeric PDF object
fn object_to_f64(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Parse a [llx lly urx ury] rectangle
fn parse_page_box(values: &[Object]) -> Result<PageBox> {
    if values.len() < 4 {
        return Err(PdfError::ParseError("Invalid MediaBox format".to_string()));
    }

    let mut coords = [0.0; 4];
    for (slot, value) in coords.iter_mut().zip(values) {
        *slot = object_to_f64(value)
            .ok_or_else(|| PdfError::ParseError("Invalid MediaBox value".to_string()))?;
    }

    Ok((coords[0], coords[1], coords[2], coords[3]))
}
