//! Text rendering utilities

use crate::document::Color;
use crate::Align;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
    /// Counter-clockwise rotation of the baseline in degrees
    pub rotation: f64,
}

/// Generate PDF operators for text insertion
///
/// Alignment is applied along the (possibly rotated) baseline, so a centred
/// rotated label stays centred on its anchor point.
///
/// # Arguments
/// * `text_hex` - Hex-encoded text (e.g., "<48656C6C6F>")
/// * `x` - X coordinate of the anchor in points (PDF coordinates, from left)
/// * `y` - Y coordinate of the anchor in points (PDF coordinates, from bottom)
/// * `align` - Text alignment relative to the anchor
/// * `ctx` - Text rendering context
pub fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let mut ops = String::new();

    let offset = match align {
        Align::Left => 0.0,
        Align::Center => -ctx.text_width / 2.0,
        Align::Right => -ctx.text_width,
    };

    ops.push_str("BT\n");
    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));

    if ctx.rotation == 0.0 {
        ops.push_str(&format!("{} {y} Td\n", x + offset));
    } else {
        let (sin, cos) = ctx.rotation.to_radians().sin_cos();
        let start_x = x + offset * cos;
        let start_y = y + offset * sin;
        ops.push_str(&format!(
            "{cos:.5} {sin:.5} {:.5} {cos:.5} {start_x:.3} {start_y:.3} Tm\n",
            -sin
        ));
    }

    ops.push_str(&format!("{text_hex} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}

/// Split text into lines that fit within `max_width`
///
/// Words are measured with `measure`; a word wider than the limit is kept on
/// its own line rather than broken. Explicit newlines start a new line.
/// Always returns at least one (possibly empty) line.
pub fn wrap_to_width<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current_line = String::new();

        for word in paragraph.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
                continue;
            }

            let candidate = format!("{current_line} {word}");
            if max_width > 0.0 && measure(&candidate) > max_width {
                lines.push(std::mem::replace(&mut current_line, word.to_string()));
            } else {
                current_line = candidate;
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
