//! Font presets offered to text layers and their export-safe family stacks.

/// A selectable font: the family used on the interactive surface plus the stack used at export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontPreset {
    pub key: &'static str,
    pub display_family: &'static str,
    pub export_stack: &'static str,
}

pub const FONT_PRESETS: [FontPreset; 4] = [
    FontPreset {
        key: "roboto",
        display_family: "Roboto",
        export_stack: "Roboto, Arial, sans-serif",
    },
    FontPreset {
        key: "playfair",
        display_family: "Playfair Display",
        export_stack: "Playfair Display, Georgia, serif",
    },
    FontPreset {
        key: "marker",
        display_family: "Permanent Marker",
        export_stack: "Permanent Marker, Impact, sans-serif",
    },
    FontPreset {
        key: "comic",
        display_family: "Comic Neue",
        export_stack: "Comic Neue, Comic Sans MS, cursive",
    },
];

pub const DEFAULT_FONT_PRESET: &str = "roboto";

pub fn font_preset(key: &str) -> Option<&'static FontPreset> {
    FONT_PRESETS.iter().find(|p| p.key == key)
}

/// Map a layer's display family to the family stack used by the export rasterizer.
///
/// Families that are not one of the presets map to themselves.
pub fn export_font_family(display_family: &str) -> &str {
    FONT_PRESETS
        .iter()
        .find(|p| p.display_family == display_family)
        .map_or(display_family, |p| p.export_stack)
}

/// Split a CSS-like family list into trimmed, unquoted names.
pub fn font_stack(families: &str) -> impl Iterator<Item = &str> {
    families
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|f| !f.is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/fonts.rs"]
mod tests;
