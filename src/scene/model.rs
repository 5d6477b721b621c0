use crate::{
    foundation::core::{Point, Position, Rgba8},
    foundation::error::{LayercompError, LayercompResult},
    transform::layer::{LayerTransform, TransformPatch, finite},
};

/// Character images offered for the sprite layer.
pub const VARIANT_PRESETS: [&str; 3] = ["variants/1.png", "variants/2.png", "variants/3.png"];

/// Sprite height as a fraction of the surface height, before the layer's own scale.
pub const SPRITE_HEIGHT_FRACTION: f64 = 0.5;

/// Opaque reference to an image resource, resolved by an [`crate::ImageLoader`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of a text layer within a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TextId(pub String);

impl TextId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    #[default]
    Solid,
    /// Top-to-bottom linear gradient with a flat primary band over the top 35%.
    Gradient,
    /// Contain-fit image over a solid primary letterbox.
    Image,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Background {
    #[serde(default)]
    pub mode: BackgroundMode,
    pub primary: Rgba8,
    pub secondary: Rgba8,
    #[serde(default)]
    pub image: Option<ImageRef>,
    /// Global alpha of the image draw only; the primary fill beneath stays opaque.
    #[serde(default = "default_opacity")]
    pub image_opacity: f64,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            mode: BackgroundMode::Solid,
            primary: Rgba8::rgb(0x29, 0x51, 0x44),
            secondary: Rgba8::rgb(0x1a, 0x38, 0x30),
            image: None,
            image_opacity: 1.0,
        }
    }
}

impl Background {
    /// The image actually painted, if the mode asks for one and one is set.
    pub fn active_image(&self) -> Option<&ImageRef> {
        match self.mode {
            BackgroundMode::Image => self.image.as_ref(),
            BackgroundMode::Solid | BackgroundMode::Gradient => None,
        }
    }

    pub(crate) fn normalized(mut self) -> LayercompResult<Self> {
        self.image_opacity = finite("image_opacity", self.image_opacity)?.clamp(0.0, 1.0);
        Ok(self)
    }
}

/// The draggable character layer. Exactly one exists per session.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sprite {
    pub variant: ImageRef,
    /// Center anchor in logical units.
    pub position: Position,
    #[serde(default)]
    pub transform: LayerTransform,
    /// Native width/height ratio of the variant image, used for drag bounds.
    #[serde(default = "default_aspect")]
    pub aspect_ratio: f64,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            variant: ImageRef::new(VARIANT_PRESETS[0]),
            position: Point::new(140.0, 120.0),
            transform: LayerTransform::default(),
            aspect_ratio: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    pub color: Rgba8,
    pub font_size: f64,
    /// Display family; mapped to an export-safe stack at render time.
    pub font_family: String,
    pub background_color: Rgba8,
    /// Chip opacity; no chip is drawn at `0`.
    #[serde(default)]
    pub background_opacity: f64,
    #[serde(flatten)]
    pub transform: LayerTransform,
}

impl TextStyle {
    pub fn with_family(font_family: impl Into<String>) -> Self {
        Self {
            color: Rgba8::WHITE,
            font_size: 24.0,
            font_family: font_family.into(),
            background_color: Rgba8::BLACK,
            background_opacity: 0.0,
            transform: LayerTransform::default(),
        }
    }
}

/// Partial text style update; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStylePatch {
    pub color: Option<Rgba8>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub background_color: Option<Rgba8>,
    pub background_opacity: Option<f64>,
    #[serde(flatten)]
    pub transform: TransformPatch,
}

impl TextStylePatch {
    pub fn apply_to(&self, base: &TextStyle) -> LayercompResult<TextStyle> {
        let mut out = base.clone();
        if let Some(c) = self.color {
            out.color = c;
        }
        if let Some(size) = self.font_size {
            let size = finite("font_size", size)?;
            if size <= 0.0 {
                return Err(LayercompError::validation("font_size must be > 0"));
            }
            out.font_size = size;
        }
        if let Some(family) = &self.font_family {
            if family.trim().is_empty() {
                return Err(LayercompError::validation("font_family must be non-empty"));
            }
            out.font_family = family.clone();
        }
        if let Some(c) = self.background_color {
            out.background_color = c;
        }
        if let Some(o) = self.background_opacity {
            out.background_opacity = finite("background_opacity", o)?.clamp(0.0, 1.0);
        }
        out.transform = self.transform.apply_to(&base.transform)?;
        Ok(out)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextLayer {
    pub id: TextId,
    /// Raw content; may contain newlines.
    pub message: String,
    /// Center anchor in logical units.
    pub position: Position,
    pub style: TextStyle,
}

/// Partial text layer update for content, position and style.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextPatch {
    pub message: Option<String>,
    pub position: Option<Position>,
    pub style: TextStylePatch,
}

/// Frozen copy of every layer, read by an export.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneSnapshot {
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub sprite: Sprite,
    /// Text layers in insertion (paint) order.
    #[serde(default)]
    pub texts: Vec<TextLayer>,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_aspect() -> f64 {
    1.0
}

pub(crate) fn finite_point(name: &str, p: Point) -> LayercompResult<Point> {
    finite(name, p.x)?;
    finite(name, p.y)?;
    Ok(p)
}
