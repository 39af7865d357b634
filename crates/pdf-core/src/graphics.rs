//! Vector graphics operators (rectangles and lines)

use crate::document::Color;

/// Stroke parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    /// Line width in points
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Paint style for rectangles
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RectStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl RectStyle {
    /// Fill only
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    /// Outline only
    pub fn stroked(color: Color, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(Stroke::new(color, width)),
        }
    }
}

/// Generate operators for a rectangle
///
/// # Arguments
/// * `x`, `y` - Lower-left corner in PDF coordinates (from bottom)
/// * `width`, `height` - Size in points
///
/// Returns an empty buffer when the style paints nothing.
pub fn generate_rect_operators(x: f64, y: f64, width: f64, height: f64, style: &RectStyle) -> Vec<u8> {
    let paint = match (style.fill, style.stroke) {
        (Some(_), Some(_)) => "B",
        (Some(_), None) => "f",
        (None, Some(_)) => "S",
        (None, None) => return Vec::new(),
    };

    let mut ops = String::from("q\n");
    if let Some(fill) = style.fill {
        ops.push_str(&format!("{} {} {} rg\n", fill.r, fill.g, fill.b));
    }
    if let Some(stroke) = style.stroke {
        ops.push_str(&format!(
            "{} {} {} RG\n{} w\n",
            stroke.color.r, stroke.color.g, stroke.color.b, stroke.width
        ));
    }
    ops.push_str(&format!("{x} {y} {width} {height} re\n{paint}\nQ\n"));

    ops.into_bytes()
}

/// Generate operators for a straight line between two points (PDF coordinates)
pub fn generate_line_operators(x1: f64, y1: f64, x2: f64, y2: f64, stroke: &Stroke) -> Vec<u8> {
    format!(
        "q\n{} {} {} RG\n{} w\n{x1} {y1} m\n{x2} {y2} l\nS\nQ\n",
        stroke.color.r, stroke.color.g, stroke.color.b, stroke.width
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_rect() {
        let ops = generate_rect_operators(10.0, 20.0, 30.0, 40.0, &RectStyle::filled(Color::white()));
        let ops = String::from_utf8(ops).unwrap();
        assert!(ops.contains("1 1 1 rg"));
        assert!(ops.contains("10 20 30 40 re"));
        assert!(ops.contains("\nf\n"));
        assert!(!ops.contains("RG"));
    }

    #[test]
    fn test_stroked_rect() {
        let ops = generate_rect_operators(0.0, 0.0, 5.0, 5.0, &RectStyle::stroked(Color::black(), 0.5));
        let ops = String::from_utf8(ops).unwrap();
        assert!(ops.contains("0 0 0 RG"));
        assert!(ops.contains("0.5 w"));
        assert!(ops.contains("\nS\n"));
    }

    #[test]
    fn test_fill_and_stroke_rect() {
        let style = RectStyle {
            fill: Some(Color::white()),
            stroke: Some(Stroke::new(Color::black(), 1.0)),
        };
        let ops = String::from_utf8(generate_rect_operators(0.0, 0.0, 1.0, 1.0, &style)).unwrap();
        assert!(ops.contains("\nB\n"));
    }

    #[test]
    fn test_empty_style_paints_nothing() {
        assert!(generate_rect_operators(0.0, 0.0, 1.0, 1.0, &RectStyle::default()).is_empty());
    }

    #[test]
    fn test_line() {
        let ops = generate_line_operators(1.0, 2.0, 3.0, 4.0, &Stroke::new(Color::red(), 2.0));
        let ops = String::from_utf8(ops).unwrap();
        assert!(ops.contains("1 0 0 RG"));
        assert!(ops.contains("2 w"));
        assert!(ops.contains("1 2 m"));
        assert!(ops.contains("3 4 l"));
    }
}
