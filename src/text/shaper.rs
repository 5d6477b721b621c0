use std::{borrow::Cow, path::Path};

use anyhow::Context;

use crate::{
    foundation::error::{LayercompError, LayercompResult},
    scene::fonts::font_stack,
    text::layout::{FontSpec, TextMeasure},
};

/// A font registered with the export shaper.
#[derive(Clone)]
pub struct RegisteredFont {
    /// Name callers use in family stacks (matched case-insensitively).
    pub alias: String,
    /// Family name reported by the font data itself.
    pub family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for RegisteredFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredFont")
            .field("alias", &self.alias)
            .field("family_name", &self.family_name)
            .finish()
    }
}

impl RegisteredFont {
    fn matches(&self, name: &str) -> bool {
        self.alias.eq_ignore_ascii_case(name) || self.family_name.eq_ignore_ascii_case(name)
    }
}

/// One shaped, unwrapped line ready to be drawn as glyph runs.
pub struct ShapedLine {
    pub layout: parley::Layout<()>,
    pub font: vello_cpu::peniko::FontData,
    pub width: f64,
    pub height: f64,
}

/// Parley-backed shaper used by the export path, both to measure and to draw text.
///
/// Fonts are registered up front from raw bytes; family stacks such as
/// `"Roboto, Arial, sans-serif"` are resolved against the registered fonts left to right.
pub struct RasterTextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    fonts: Vec<RegisteredFont>,
}

impl Default for RasterTextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterTextEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: Vec::new(),
        }
    }

    /// Register font bytes under `alias`; returns the family name found in the data.
    pub fn register_font(&mut self, alias: &str, font_bytes: Vec<u8>) -> LayercompResult<String> {
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font_bytes.clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            LayercompError::resource(format!("no font families found in font '{alias}'"))
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LayercompError::resource(format!("font '{alias}' has no family name")))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        self.fonts.push(RegisteredFont {
            alias: alias.to_string(),
            family_name: family_name.clone(),
            font,
        });
        tracing::debug!(alias, family = %family_name, "registered font");
        Ok(family_name)
    }

    pub fn register_font_file(&mut self, alias: &str, path: &Path) -> LayercompResult<String> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font bytes from '{}'", path.display()))
            .map_err(|e| LayercompError::resource(format!("{e:#}")))?;
        self.register_font(alias, bytes)
    }

    pub fn fonts(&self) -> &[RegisteredFont] {
        &self.fonts
    }

    /// Resolve a family stack to a registered font.
    ///
    /// Falls back to the first registered font when nothing in the stack matches; fails only when
    /// no font is registered at all.
    pub fn resolve(&self, family_stack: &str) -> LayercompResult<&RegisteredFont> {
        for name in font_stack(family_stack) {
            if let Some(found) = self.fonts.iter().find(|f| f.matches(name)) {
                return Ok(found);
            }
        }
        let fallback = self.fonts.first().ok_or_else(|| {
            LayercompError::resource(format!(
                "no font registered to draw family '{family_stack}'"
            ))
        })?;
        tracing::warn!(
            requested = family_stack,
            fallback = %fallback.family_name,
            "font family not registered, using fallback"
        );
        Ok(fallback)
    }

    /// Shape `text` as a single unwrapped line.
    pub fn shape_line(&mut self, text: &str, font: &FontSpec) -> LayercompResult<ShapedLine> {
        if !font.size_px.is_finite() || font.size_px <= 0.0 {
            return Err(LayercompError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let resolved = self.resolve(&font.family)?;
        let family_name = resolved.family_name.clone();
        let font_data = resolved.font.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px as f32));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        Ok(ShapedLine {
            width: f64::from(layout.width()),
            height: f64::from(layout.height()),
            layout,
            font: font_data,
        })
    }
}

impl TextMeasure for RasterTextEngine {
    fn measure(&mut self, text: &str, font: &FontSpec) -> LayercompResult<f64> {
        if text.is_empty() {
            return Ok(0.0);
        }
        Ok(self.shape_line(text, font)?.width)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/shaper.rs"]
mod tests;
