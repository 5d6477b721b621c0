//! Multi-line text layout shared by the interactive preview and the raster export.
//!
//! The algorithm is written once and parameterized by a [`TextMeasure`]; the preview plugs in its
//! own metrics (or [`ApproxMeasure`]) and the export plugs in [`crate::RasterTextEngine`].

use crate::{
    foundation::core::Rect,
    foundation::error::{LayercompError, LayercompResult},
};

/// Line box height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;
/// Padding around the text block inside its background chip, in logical units.
pub const CHIP_PADDING: f64 = 16.0;
/// Corner radius of the background chip, in logical units.
pub const CHIP_RADIUS: f64 = 8.0;
/// Maximum line width before word-wrapping kicks in, in logical units.
pub const TEXT_WRAP_WIDTH: f64 = 400.0;
/// Average glyph advance as a fraction of the font size, for metric-free estimates.
pub const APPROX_CHAR_WIDTH_EM: f64 = 0.6;

/// Font family (or family stack) and pixel size used to measure a run of text.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f64,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            size_px,
        }
    }
}

/// Width of a single unwrapped run of text.
pub trait TextMeasure {
    fn measure(&mut self, text: &str, font: &FontSpec) -> LayercompResult<f64>;
}

impl<F> TextMeasure for F
where
    F: FnMut(&str, &FontSpec) -> f64,
{
    fn measure(&mut self, text: &str, font: &FontSpec) -> LayercompResult<f64> {
        Ok(self(text, font))
    }
}

/// Character-count estimate: `chars * size_px * char_width_em`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApproxMeasure {
    pub char_width_em: f64,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        Self {
            char_width_em: APPROX_CHAR_WIDTH_EM,
        }
    }
}

impl TextMeasure for ApproxMeasure {
    fn measure(&mut self, text: &str, font: &FontSpec) -> LayercompResult<f64> {
        Ok(text.chars().count() as f64 * font.size_px * self.char_width_em)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub width: f64,
}

/// Result of laying out one text layer: wrapped lines and block extents.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
    pub max_width: f64,
    pub line_height: f64,
    pub height: f64,
}

impl TextBlock {
    /// Vertical center of line `index`, relative to the block center.
    pub fn line_center_y(&self, index: usize) -> f64 {
        -self.height / 2.0 + (index as f64 + 0.5) * self.line_height
    }

    /// Background chip rectangle centered on the block center.
    pub fn chip_rect(&self, padding: f64) -> Rect {
        let hw = self.max_width / 2.0 + padding;
        let hh = self.height / 2.0 + padding;
        Rect::new(-hw, -hh, hw, hh)
    }
}

/// Split on newlines, greedily word-wrap each paragraph, and size the block.
///
/// Blank paragraphs stay as blank lines. A single word wider than `max_line_width` is kept whole
/// on its own line.
pub fn layout_text(
    message: &str,
    font: &FontSpec,
    max_line_width: f64,
    measure: &mut dyn TextMeasure,
) -> LayercompResult<TextBlock> {
    if !font.size_px.is_finite() || font.size_px <= 0.0 {
        return Err(LayercompError::validation(
            "text size_px must be finite and > 0",
        ));
    }

    let mut lines = Vec::new();
    for paragraph in message.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        wrap_paragraph(paragraph, font, max_line_width, measure, &mut lines)?;
    }

    let max_width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
    let line_height = font.size_px * LINE_HEIGHT_FACTOR;
    let height = lines.len() as f64 * line_height;
    Ok(TextBlock {
        lines,
        max_width,
        line_height,
        height,
    })
}

fn wrap_paragraph(
    paragraph: &str,
    font: &FontSpec,
    max_line_width: f64,
    measure: &mut dyn TextMeasure,
    out: &mut Vec<TextLine>,
) -> LayercompResult<()> {
    let mut words = paragraph.split_whitespace();
    let Some(first) = words.next() else {
        out.push(TextLine {
            text: String::new(),
            width: 0.0,
        });
        return Ok(());
    };

    let mut current = first.to_string();
    let mut current_width = measure.measure(&current, font)?;
    for word in words {
        let candidate = format!("{current} {word}");
        let candidate_width = measure.measure(&candidate, font)?;
        if candidate_width < max_line_width {
            current = candidate;
            current_width = candidate_width;
        } else {
            out.push(TextLine {
                text: std::mem::replace(&mut current, word.to_string()),
                width: current_width,
            });
            current_width = measure.measure(&current, font)?;
        }
    }
    out.push(TextLine {
        text: current,
        width: current_width,
    });
    Ok(())
}

/// Rough on-surface extent of a text layer, used where exact glyph metrics are not needed.
///
/// Width follows the longest raw line by character count; height counts raw lines.
pub fn approx_text_extent(message: &str, font_size: f64, scale: f64) -> (f64, f64) {
    let (mut longest, mut count) = (0usize, 0usize);
    for line in message.split('\n') {
        longest = longest.max(line.chars().count());
        count += 1;
    }
    let size = font_size * scale.abs();
    (
        longest as f64 * size * APPROX_CHAR_WIDTH_EM,
        count as f64 * size * LINE_HEIGHT_FACTOR,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
