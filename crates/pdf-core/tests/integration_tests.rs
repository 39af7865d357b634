//! Integration tests for pdf-core
//!
//! Documents are serialized and re-parsed with lopdf to check what a viewer
//! would actually see.

use lopdf::{dictionary, Document, Object};
use pdf_core::{
    Align, Color, ImageScaleMode, ImageXObject, PdfDocument, PdfError, RectStyle, StandardFont,
    Stroke, TextStyle,
};
use pretty_assertions::assert_eq;

const A4: (f64, f64) = (595.28, 841.89);

/// A one-page PDF whose page already uses a font named /F1 via referenced resources
fn create_template_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let contents_id = doc.add_object(lopdf::Stream::new(
        dictionary! {},
        b"BT /F1 12 Tf 50 50 Td (Template) Tj ET".to_vec(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Resources" => resources_id,
        "Contents" => contents_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 2, image::Rgb([200, 10, 10]));
    let mut buffer = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

fn helvetica_doc() -> PdfDocument {
    let mut doc = PdfDocument::new(A4.0, A4.1).unwrap();
    doc.register_standard_family("helvetica", StandardFont::Helvetica, StandardFont::HelveticaBold)
        .unwrap();
    doc
}

fn page_content(doc: &Document) -> String {
    let page_id = doc.get_pages()[&1];
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

fn page_resources(doc: &Document) -> lopdf::Dictionary {
    let page_id = doc.get_pages()[&1];
    let page = doc.get_dictionary(page_id).unwrap();
    page.get(b"Resources").unwrap().as_dict().unwrap().clone()
}

#[test]
fn test_blank_document_with_text() {
    let mut doc = helvetica_doc();
    let style = TextStyle::new("helvetica", 12.0);
    doc.insert_text("Permit", 1, 100.0, 100.0, Align::Left, &style).unwrap();

    let bytes = doc.into_bytes().unwrap();
    let reloaded = Document::load_mem(&bytes).unwrap();

    assert_eq!(reloaded.get_pages().len(), 1);
    let content = page_content(&reloaded);
    assert!(content.contains("<5065726D6974> Tj"));
    assert!(content.contains("/CF1 12 Tf"));

    let resources = page_resources(&reloaded);
    let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
    let font_id = fonts.get(b"CF1").unwrap().as_reference().unwrap();
    let font = reloaded.get_dictionary(font_id).unwrap();
    assert_eq!(font.get(b"BaseFont").unwrap().as_name_str().unwrap(), "Helvetica");
}

#[test]
fn test_bold_variant_gets_own_resource() {
    let mut doc = helvetica_doc();
    let regular = TextStyle::new("helvetica", 10.0);
    let bold = regular.clone().with_weight(pdf_core::FontWeight::Bold);
    doc.insert_text("A", 1, 10.0, 10.0, Align::Left, &regular).unwrap();
    doc.insert_text("B", 1, 10.0, 20.0, Align::Left, &bold).unwrap();

    let reloaded = Document::load_mem(&doc.into_bytes().unwrap()).unwrap();
    let resources = page_resources(&reloaded);
    let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
    let bold_id = fonts.get(b"CF2").unwrap().as_reference().unwrap();
    let bold_font = reloaded.get_dictionary(bold_id).unwrap();
    assert_eq!(
        bold_font.get(b"BaseFont").unwrap().as_name_str().unwrap(),
        "Helvetica-Bold"
    );
}

#[test]
fn test_paint_order_is_preserved() {
    let mut doc = helvetica_doc();
    let style = TextStyle::new("helvetica", 10.0).with_color(Color::white());
    doc.draw_rect(1, 10.0, 10.0, 100.0, 20.0, &RectStyle::filled(Color::black()))
        .unwrap();
    doc.insert_text("X", 1, 20.0, 25.0, Align::Left, &style).unwrap();

    let reloaded = Document::load_mem(&doc.into_bytes().unwrap()).unwrap();
    let content = page_content(&reloaded);
    let rect_at = content.find(" re").unwrap();
    let text_at = content.find("<58> Tj").unwrap();
    assert!(rect_at < text_at, "band must be painted before its label");
}

#[test]
fn test_rect_and_line_coordinates() {
    let mut doc = PdfDocument::new(200.0, 100.0).unwrap();
    doc.draw_rect(1, 10.0, 10.0, 50.0, 20.0, &RectStyle::stroked(Color::black(), 1.0))
        .unwrap();
    doc.draw_line(1, (0.0, 50.0), (200.0, 50.0), &Stroke::new(Color::black(), 0.5))
        .unwrap();

    let reloaded = Document::load_mem(&doc.into_bytes().unwrap()).unwrap();
    let content = page_content(&reloaded);
    // Top edge at y=10 from the top: lower-left corner sits at 100 - 10 - 20
    assert!(content.contains("10 70 50 20 re"));
    assert!(content.contains("0 50 m"));
    assert!(content.contains("200 50 l"));
}

#[test]
fn test_image_embedded_once() {
    let image = ImageXObject::decode(&tiny_png()).unwrap();
    let mut doc = PdfDocument::new(A4.0, A4.1).unwrap();
    doc.insert_image(&image, 1, 10.0, 10.0, 40.0, 20.0, ImageScaleMode::Stretch)
        .unwrap();
    doc.insert_image(&image, 1, 60.0, 10.0, 40.0, 20.0, ImageScaleMode::Stretch)
        .unwrap();

    let reloaded = Document::load_mem(&doc.into_bytes().unwrap()).unwrap();
    let resources = page_resources(&reloaded);
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    assert_eq!(xobjects.len(), 1);
    assert_eq!(page_content(&reloaded).matches("/CIm1 Do").count(), 2);
}

#[test]
fn test_template_resources_are_preserved() {
    let mut doc = PdfDocument::open_from_bytes(&create_template_pdf()).unwrap();
    doc.register_standard_family("helvetica", StandardFont::Helvetica, StandardFont::HelveticaBold)
        .unwrap();

    // MediaBox is inherited from the Pages node
    assert_eq!(doc.page_size(1).unwrap(), (612.0, 792.0));

    let style = TextStyle::new("helvetica", 9.0);
    doc.insert_text("Overlay", 1, 72.0, 72.0, Align::Left, &style).unwrap();

    let reloaded = Document::load_mem(&doc.into_bytes().unwrap()).unwrap();
    let resources = page_resources(&reloaded);
    let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
    assert!(fonts.has(b"F1"));
    assert!(fonts.has(b"CF1"));

    let content = page_content(&reloaded);
    let template_at = content.find("(Template) Tj").unwrap();
    let overlay_at = content.find("/CF1 9 Tf").unwrap();
    assert!(template_at < overlay_at);
    assert!(content.contains("72 720 Td"));
}

#[test]
fn test_invalid_template_bytes() {
    assert!(matches!(
        PdfDocument::open_from_bytes(b"not a pdf"),
        Err(PdfError::OpenError(_))
    ));
}

#[test]
fn test_output_is_deterministic() {
    let render = || {
        let mut doc = helvetica_doc();
        let style = TextStyle::new("helvetica", 11.0);
        doc.insert_text("Same", 1, 30.0, 40.0, Align::Center, &style).unwrap();
        doc.insert_text_rotated("Tilted", 1, 200.0, 300.0, 45.0, Align::Center, &style)
            .unwrap();
        doc.into_bytes().unwrap()
    };

    assert_eq!(render(), render());
}
