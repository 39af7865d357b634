//! Page geometry and palette

use pdf_core::Color;
use serde::{Deserialize, Serialize};

/// 8-bit RGB triple as written in configuration files (`[0, 51, 102]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_color(self) -> Color {
        Color::from_rgb(self.0, self.1, self.2)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        rgb.to_color()
    }
}

/// Fixed certificate palette
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Frames, bands and plate
    pub accent: Rgb,
    /// Body text
    pub dark: Rgb,
    /// Footer and signer titles
    pub gray: Rgb,
    pub white: Rgb,
    /// Low-contrast watermark label
    pub watermark: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: Rgb(0, 51, 102),
            dark: Rgb(33, 33, 33),
            gray: Rgb(120, 120, 120),
            white: Rgb(255, 255, 255),
            watermark: Rgb(235, 235, 235),
        }
    }
}

/// Page geometry in millimetres, origin top-left, y growing downward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub palette: Palette,
}

impl Default for DocumentGeometry {
    /// A4 portrait with 15 mm margins
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 15.0,
            palette: Palette::default(),
        }
    }
}

impl DocumentGeometry {
    /// Width between the left and right margins
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    pub fn center_x(&self) -> f64 {
        self.page_width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.page_height / 2.0
    }

    /// Same palette and margin on a page of a different size
    pub fn with_page_size(&self, width: f64, height: f64) -> Self {
        Self {
            page_width: width,
            page_height: height,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_defaults() {
        let geometry = DocumentGeometry::default();
        assert_eq!(geometry.content_width(), 180.0);
        assert_eq!(geometry.center_x(), 105.0);
        assert_eq!(geometry.center_y(), 148.5);
    }

    #[test]
    fn test_partial_config() {
        let geometry: DocumentGeometry =
            serde_json::from_str(r#"{"margin": 20, "palette": {"accent": [128, 0, 0]}}"#).unwrap();
        assert_eq!(geometry.page_width, 210.0);
        assert_eq!(geometry.content_width(), 170.0);
        assert_eq!(geometry.palette.accent, Rgb(128, 0, 0));
        assert_eq!(geometry.palette.dark, Rgb(33, 33, 33));
    }

    #[test]
    fn test_rgb_to_color() {
        let color = Rgb(255, 0, 0).to_color();
        assert_eq!(color, Color::red());
    }
}
