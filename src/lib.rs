//! Layercomp composes a layered image and exports it deterministically.
//!
//! A [`Session`] owns a background, one draggable sprite and any number of styled, word-wrapped
//! text layers, all positioned on a fixed 500-unit logical surface. The public API covers:
//!
//! - Editing: session commands plus the [`DragController`] for pointer/touch dragging
//! - Layout: [`layout_text`], written once over a [`TextMeasure`]
//! - Export: [`render_scene`] / [`Exporter`] rasterize a [`SceneSnapshot`] at any size
#![forbid(unsafe_code)]

pub mod assets;
pub mod foundation;
pub mod interact;
pub mod render;
pub mod scene;
pub mod text;
pub mod transform;

pub use crate::foundation::core::{Affine, Canvas, Point, Position, Rect, Rgba8, Rgba8Premul, Vec2};
pub use crate::foundation::error::{LayercompError, LayercompResult};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::loader::{FsImageLoader, ImageLoader, MemoryImageLoader, load_scene_images};
pub use crate::interact::drag::{DragController, DragState, PointerInput, ReleaseKind};
pub use crate::render::export::{
    ExportSettings, Exporter, RasterFingerprint, RasterImage, render_scene,
};
pub use crate::render::plan::{DrawOp, RenderPlan, compile_scene};
pub use crate::scene::fonts::{FONT_PRESETS, FontPreset, export_font_family};
pub use crate::scene::model::{
    Background, BackgroundMode, ImageRef, SceneSnapshot, Sprite, TextId, TextLayer, TextPatch,
    TextStyle, TextStylePatch,
};
pub use crate::scene::session::Session;
pub use crate::text::layout::{ApproxMeasure, FontSpec, TextBlock, TextMeasure, layout_text};
pub use crate::text::shaper::RasterTextEngine;
pub use crate::transform::layer::{LayerTransform, TransformPatch};
pub use crate::transform::scaling::{LOGICAL_EXTENT, SpaceMapping, to_export_space};
