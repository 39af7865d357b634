//! Font handling for PDF documents
//!
//! Two kinds of fonts are supported: the PDF standard Helvetica faces, which
//! need no embedding and are measured from built-in AFM widths, and TrueType
//! faces which are embedded as Type0/CIDFontType2 with Identity-H encoding.

use crate::{PdfError, Result};
use lopdf::{Dictionary, Object, Stream};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Standard (base-14) fonts available without embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

/// Helvetica advance widths for U+0020..=U+007E (1/1000 em)
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica-Bold advance widths for U+0020..=U+007E (1/1000 em)
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

impl StandardFont {
    /// PostScript name used as /BaseFont
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Advance width of a character in 1/1000 em
    pub fn char_width(&self, c: char) -> u16 {
        let table = match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };

        match c {
            ' '..='~' => table[c as usize - 0x20],
            '\u{2014}' | '\u{2026}' => 1000,
            '\u{2018}' | '\u{2019}' => 278,
            '\u{201C}' | '\u{201D}' => 500,
            '\u{2022}' => 350,
            _ => 556,
        }
    }
}

/// Map a character to its WinAnsiEncoding byte, `?` when unmappable
pub fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '\u{20AC}' => 0x80,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        _ => b'?',
    }
}

/// Where a font's glyphs and metrics come from
#[derive(Debug, Clone)]
enum FontSource {
    Standard(StandardFont),
    /// Raw font file, shared between clones of the same face
    TrueType(Arc<[u8]>),
}

/// Font data for a single variant
#[derive(Debug, Clone)]
pub struct FontData {
    /// Font name/identifier
    pub name: String,
    /// Characters used (drives /W and ToUnicode for embedded fonts)
    pub used_chars: BTreeSet<char>,
    source: FontSource,
}

/// PDF objects generated for a font resource
pub enum FontObjects {
    /// Non-embedded Type1 font dictionary
    Simple(Dictionary),
    /// Embedded TrueType font; references are patched when added to the document
    Composite {
        type0_font: Dictionary,
        cid_font: Dictionary,
        font_descriptor: Dictionary,
        font_file_stream: Stream,
        tounicode_stream: Stream,
    },
}

/// Font family with regular and bold variants
#[derive(Debug, Clone, Default)]
pub struct FontFamily {
    pub regular: Option<FontData>,
    pub bold: Option<FontData>,
}

impl FontFamily {
    /// Get the font data for the specified weight, falling back to regular
    pub fn get_variant(&self, weight: FontWeight) -> Option<&FontData> {
        match weight {
            FontWeight::Bold => self.bold.as_ref().or(self.regular.as_ref()),
            FontWeight::Regular => self.regular.as_ref(),
        }
    }

    /// Mutable counterpart of [`FontFamily::get_variant`]
    pub fn get_variant_mut(&mut self, weight: FontWeight) -> Option<&mut FontData> {
        match weight {
            FontWeight::Bold if self.bold.is_some() => self.bold.as_mut(),
            _ => self.regular.as_mut(),
        }
    }

    /// Iterate over the variants that are present
    pub fn variants(&self) -> impl Iterator<Item = &FontData> {
        [&self.regular, &self.bold].into_iter().flatten()
    }
}

/// Builder for registering TrueType font families
#[derive(Default)]
pub struct FontFamilyBuilder {
    regular: Option<Vec<u8>>,
    bold: Option<Vec<u8>>,
}

impl FontFamilyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regular(mut self, ttf_data: Vec<u8>) -> Self {
        self.regular = Some(ttf_data);
        self
    }

    pub fn bold(mut self, ttf_data: Vec<u8>) -> Self {
        self.bold = Some(ttf_data);
        self
    }

    /// Build the FontFamily from the provided TTF data
    pub fn build(self, family_name: &str) -> Result<FontFamily> {
        let regular = match self.regular {
            Some(ttf_data) => FontData::from_ttf(&format!("{family_name}-regular"), &ttf_data)?,
            None => {
                return Err(PdfError::FontParseError(
                    "FontFamily must have at least a regular variant".to_string(),
                ))
            }
        };

        let bold = self
            .bold
            .map(|data| FontData::from_ttf(&format!("{family_name}-bold"), &data))
            .transpose()?;

        Ok(FontFamily {
            regular: Some(regular),
            bold,
        })
    }
}

impl FontData {
    /// Create font data for a standard font
    pub fn standard(name: &str, font: StandardFont) -> Self {
        Self {
            name: name.to_string(),
            used_chars: BTreeSet::new(),
            source: FontSource::Standard(font),
        }
    }

    /// Create font data from TTF bytes
    ///
    /// The bytes are validated here and shared by every clone; the face
    /// itself is re-parsed from them when metrics are needed.
    pub fn from_ttf(name: &str, ttf_data: &[u8]) -> Result<Self> {
        ttf_parser::Face::parse(ttf_data, 0)
            .map_err(|e| PdfError::FontParseError(format!("{e:?}")))?;

        Ok(Self {
            name: name.to_string(),
            used_chars: BTreeSet::new(),
            source: FontSource::TrueType(Arc::from(ttf_data)),
        })
    }

    /// Add characters to the used set
    pub fn add_chars(&mut self, text: &str) {
        self.used_chars.extend(text.chars());
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        match &self.source {
            FontSource::TrueType(data) => ttf_parser::Face::parse(data, 0).ok(),
            FontSource::Standard(_) => None,
        }
    }

    /// Get glyph ID for a character (TrueType only)
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face().as_ref().and_then(|face| glyph_of(face, c))
    }

    /// Get font units per em
    pub fn units_per_em(&self) -> u16 {
        self.face().map(|face| face.units_per_em()).unwrap_or(1000)
    }

    /// Get font ascender
    pub fn ascender(&self) -> i16 {
        match &self.source {
            FontSource::Standard(_) => 718,
            FontSource::TrueType(_) => self.face().map(|f| f.ascender()).unwrap_or(800),
        }
    }

    /// Get font descender
    pub fn descender(&self) -> i16 {
        match &self.source {
            FontSource::Standard(_) => -207,
            FontSource::TrueType(_) => self.face().map(|f| f.descender()).unwrap_or(-200),
        }
    }

    /// Calculate text width in font units
    pub fn text_width(&self, text: &str) -> u32 {
        match &self.source {
            FontSource::Standard(font) => text.chars().map(|c| font.char_width(c) as u32).sum(),
            FontSource::TrueType(_) => match self.face() {
                Some(face) => text
                    .chars()
                    .filter_map(|c| face.glyph_hor_advance(face.glyph_index(c)?))
                    .map(|w| w as u32)
                    .sum(),
                None => 0,
            },
        }
    }

    /// Calculate text width in points for a given font size
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f32 {
        let width = self.text_width(text);
        let units_per_em = self.units_per_em() as f32;
        (width as f32 / units_per_em) * font_size
    }

    /// Encode text as a hex string operand for the Tj operator
    ///
    /// Standard fonts use one WinAnsi byte per character, embedded fonts use
    /// two-byte glyph IDs (Identity-H).
    pub fn encode_text_hex(&self, text: &str) -> String {
        let mut result = String::new();
        match &self.source {
            FontSource::Standard(_) => {
                for c in text.chars() {
                    result.push_str(&format!("{:02X}", win_ansi_byte(c)));
                }
            }
            FontSource::TrueType(_) => {
                let face = self.face();
                for c in text.chars() {
                    let gid = face.as_ref().and_then(|f| glyph_of(f, c)).unwrap_or(0);
                    result.push_str(&format!("{gid:04X}"));
                }
            }
        }
        format!("<{result}>")
    }

    /// Generate the PDF objects needed to reference this font
    pub fn to_pdf_objects(&self) -> Result<FontObjects> {
        let ttf_data = match &self.source {
            FontSource::Standard(font) => {
                return Ok(FontObjects::Simple(Dictionary::from_iter(vec![
                    ("Type", "Font".into()),
                    ("Subtype", "Type1".into()),
                    ("BaseFont", font.base_font().into()),
                    ("Encoding", "WinAnsiEncoding".into()),
                ])));
            }
            FontSource::TrueType(data) => data,
        };

        let font_name = Object::Name(self.name.clone().into());

        let tounicode_content = self.generate_tounicode_cmap();
        let tounicode_stream = Stream::new(
            Dictionary::from_iter(vec![("Type", "CMap".into())]),
            tounicode_content.into_bytes(),
        );

        let font_file_stream = Stream::new(
            Dictionary::from_iter(vec![("Length1", (ttf_data.len() as i64).into())]),
            ttf_data.to_vec(),
        );

        let units_per_em = self.units_per_em() as i64;
        let ascender = self.ascender() as i64;
        let descender = self.descender() as i64;

        let font_descriptor = Dictionary::from_iter(vec![
            ("Type", "FontDescriptor".into()),
            ("FontName", font_name.clone()),
            ("Flags", 4.into()),
            (
                "FontBBox",
                vec![0.into(), descender.into(), units_per_em.into(), ascender.into()].into(),
            ),
            ("ItalicAngle", 0.into()),
            ("Ascent", ascender.into()),
            ("Descent", descender.into()),
            ("CapHeight", ascender.into()),
            ("StemV", 80.into()),
        ]);

        let cid_system_info = Dictionary::from_iter(vec![
            ("Registry", Object::string_literal("Adobe")),
            ("Ordering", Object::string_literal("Identity")),
            ("Supplement", 0.into()),
        ]);

        let cid_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "CIDFontType2".into()),
            ("BaseFont", font_name.clone()),
            ("CIDSystemInfo", cid_system_info.into()),
            ("W", self.generate_widths_array().into()),
            ("DW", 1000.into()),
        ]);

        let type0_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type0".into()),
            ("BaseFont", font_name),
            ("Encoding", "Identity-H".into()),
        ]);

        Ok(FontObjects::Composite {
            type0_font,
            cid_font,
            font_descriptor,
            font_file_stream,
            tounicode_stream,
        })
    }

    /// Generate /W array for glyph widths: [gid1 [w1] gid2 [w2] ...]
    fn generate_widths_array(&self) -> Vec<Object> {
        let mut widths = Vec::new();
        let face = match self.face() {
            Some(f) => f,
            None => return widths,
        };

        let mut gids: Vec<u16> = self
            .used_chars
            .iter()
            .filter_map(|&c| glyph_of(&face, c))
            .collect();
        gids.sort_unstable();
        gids.dedup();

        // /W is expressed in 1/1000 em regardless of the face's units
        let scale = 1000.0 / face.units_per_em() as f32;
        for gid in gids {
            let advance = face
                .glyph_hor_advance(ttf_parser::GlyphId(gid))
                .unwrap_or(1000);
            widths.push((gid as i64).into());
            widths.push(vec![((advance as f32 * scale).round() as i64).into()].into());
        }

        widths
    }

    /// Generate ToUnicode CMap stream content
    fn generate_tounicode_cmap(&self) -> String {
        let mut cmap = String::new();

        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        let face = self.face();
        let char_list: Vec<char> = self.used_chars.iter().copied().collect();

        // bfchar sections are limited to 100 entries
        for chunk in char_list.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for c in chunk {
                let gid = face.as_ref().and_then(|f| glyph_of(f, *c)).unwrap_or(0);
                let unicode = *c as u32;
                cmap.push_str(&format!("<{gid:04X}> <{unicode:04X}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");

        cmap
    }
}

fn glyph_of(face: &ttf_parser::Face<'_>, c: char) -> Option<u16> {
    face.glyph_index(c).map(|id| id.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// TrueType font data without a parsed face, enough to exercise the API
    fn faceless_ttf() -> FontData {
        FontData {
            name: "test".to_string(),
            used_chars: BTreeSet::new(),
            source: FontSource::TrueType(Arc::from(vec![0u8; 100])),
        }
    }

    #[test]
    fn test_helvetica_widths() {
        let font = FontData::standard("helvetica", StandardFont::Helvetica);
        assert_eq!(font.text_width("A"), 667);
        assert_eq!(font.text_width("il"), 444);
        assert!((font.text_width_points("A", 10.0) - 6.67).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = FontData::standard("r", StandardFont::Helvetica);
        let bold = FontData::standard("b", StandardFont::HelveticaBold);
        let text = "BUSINESS PERMIT";
        assert!(bold.text_width(text) > regular.text_width(text));
    }

    #[test]
    fn test_standard_encoding() {
        let font = FontData::standard("helvetica", StandardFont::Helvetica);
        assert_eq!(font.encode_text_hex("Hi"), "<4869>");
        assert_eq!(font.encode_text_hex(""), "<>");
        // ñ is in Latin-1, ₱ is not in WinAnsi
        assert_eq!(font.encode_text_hex("ñ"), "<F1>");
        assert_eq!(font.encode_text_hex("₱"), "<3F>");
    }

    #[test]
    fn test_standard_pdf_objects() {
        let font = FontData::standard("helvetica-bold", StandardFont::HelveticaBold);
        match font.to_pdf_objects().unwrap() {
            FontObjects::Simple(dict) => {
                assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Type1");
                assert_eq!(
                    dict.get(b"BaseFont").unwrap().as_name().unwrap(),
                    b"Helvetica-Bold"
                );
            }
            FontObjects::Composite { .. } => panic!("standard font must not be embedded"),
        }
    }

    #[test]
    fn test_add_chars() {
        let mut font = faceless_ttf();
        font.add_chars("Hello");
        assert_eq!(font.used_chars.len(), 4);
        assert!(font.used_chars.contains(&'H'));
        assert!(font.used_chars.contains(&'l'));
    }

    #[test]
    fn test_faceless_metrics_defaults() {
        let font = faceless_ttf();
        assert_eq!(font.units_per_em(), 1000);
        assert_eq!(font.ascender(), 800);
        assert_eq!(font.descender(), -200);
        assert_eq!(font.text_width("Hello"), 0);
        assert_eq!(font.encode_text_hex("AB"), "<00000000>");
    }

    #[test]
    fn test_composite_pdf_objects() {
        let mut font = faceless_ttf();
        font.add_chars("AB");

        match font.to_pdf_objects().unwrap() {
            FontObjects::Composite {
                type0_font,
                tounicode_stream,
                font_file_stream,
                ..
            } => {
                assert_eq!(type0_font.get(b"Subtype").unwrap().as_name().unwrap(), b"Type0");
                assert_eq!(font_file_stream.content.len(), 100);
                let cmap = String::from_utf8(tounicode_stream.content).unwrap();
                assert!(cmap.contains("<0000> <0041>"));
                assert!(cmap.contains("<0000> <0042>"));
            }
            FontObjects::Simple(_) => panic!("TrueType font must be embedded"),
        }
    }

    #[test]
    fn test_family_bold_falls_back_to_regular() {
        let family = FontFamily {
            regular: Some(FontData::standard("r", StandardFont::Helvetica)),
            bold: None,
        };
        assert_eq!(family.get_variant(FontWeight::Bold).unwrap().name, "r");
        assert_eq!(family.variants().count(), 1);
    }

    #[test]
    fn test_builder_requires_regular() {
        let result = FontFamilyBuilder::new().build("empty");
        assert!(matches!(result, Err(PdfError::FontParseError(_))));
    }

    #[test]
    fn test_clones_share_font_bytes() {
        let font = faceless_ttf();
        let mut copy = font.clone();
        copy.add_chars("Permit");

        match (&font.source, &copy.source) {
            (FontSource::TrueType(a), FontSource::TrueType(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected TrueType sources"),
        }
        assert!(font.used_chars.is_empty());
    }

    #[test]
    fn test_from_ttf_rejects_garbage() {
        assert!(FontData::from_ttf("bad", &[0u8; 16]).is_err());
    }
}
