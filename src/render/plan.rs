//! Scene → draw-op compilation for the export path.
//!
//! A [`RenderPlan`] is a flat, backend-agnostic list of draw operations in paint order:
//! background, then the sprite, then every text layer in insertion order. All geometry is already
//! in output pixels, so the executor never needs to know about the logical surface.

use crate::{
    assets::loader::SceneImages,
    foundation::core::{Affine, Canvas, Point, Rect, RoundedRect, Rgba8},
    foundation::error::LayercompResult,
    render::export::ExportSettings,
    scene::fonts::export_font_family,
    scene::model::{
        Background, BackgroundMode, SPRITE_HEIGHT_FRACTION, SceneSnapshot, Sprite, TextLayer,
    },
    text::layout::{
        CHIP_PADDING, CHIP_RADIUS, FontSpec, TEXT_WRAP_WIDTH, TextMeasure, layout_text,
    },
    transform::scaling::SpaceMapping,
};

/// Offset (as a fraction of the gradient length) where the primary band ends.
pub const GRADIENT_BAND_END: f32 = 0.35;

#[derive(Clone, Debug)]
/// Backend-agnostic plan for one exported image.
pub struct RenderPlan {
    pub canvas: Canvas,
    /// Straight RGBA the target is cleared to before the first op.
    pub clear_rgba: [u8; 4],
    pub ops: Vec<DrawOp>,
}

/// Which decoded scene image an [`DrawOp::Image`] samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSlot {
    Background,
    Sprite,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FillPaint {
    Solid(Rgba8),
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<(f32, Rgba8)>,
    },
}

/// Rounded background rectangle behind a text block, in block-local pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct TextChip {
    pub shape: RoundedRect,
    pub color: Rgba8,
}

/// One wrapped line, centered on `center` in block-local pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedLine {
    pub text: String,
    pub center: Point,
}

#[derive(Clone, Debug)]
/// Draw operation emitted by [`compile_scene`].
pub enum DrawOp {
    FillRect {
        rect: Rect,
        paint: FillPaint,
    },
    /// Draw the image's native `0..w x 0..h` rectangle under `transform`.
    Image {
        slot: ImageSlot,
        transform: Affine,
        opacity: f32,
    },
    /// A whole text layer: optional chip, then lines, all under one transform and opacity.
    TextBlock {
        transform: Affine,
        opacity: f32,
        chip: Option<TextChip>,
        lines: Vec<PlannedLine>,
        color: Rgba8,
        font: FontSpec,
    },
}

/// Lay out every layer of `snapshot` for a `settings`-sized target.
///
/// `measure` is the export text metric; it decides wrapping, so it must be the same shaper the
/// executor later draws with.
#[tracing::instrument(skip_all, fields(width = settings.width, height = settings.height, texts = snapshot.texts.len()))]
pub fn compile_scene(
    snapshot: &SceneSnapshot,
    images: &SceneImages,
    measure: &mut dyn TextMeasure,
    settings: &ExportSettings,
) -> LayercompResult<RenderPlan> {
    settings.validate()?;
    let mapping = settings.mapping();
    let canvas = settings.canvas();
    let full = Rect::new(0.0, 0.0, f64::from(canvas.width), f64::from(canvas.height));

    let mut ops = Vec::with_capacity(2 + snapshot.texts.len());
    compile_background(&snapshot.background, images, full, &mut ops);
    compile_sprite(&snapshot.sprite, images, full, mapping, &mut ops);
    for layer in &snapshot.texts {
        if let Some(op) = compile_text(layer, mapping, measure)? {
            ops.push(op);
        }
    }

    Ok(RenderPlan {
        canvas,
        clear_rgba: settings.clear_rgba,
        ops,
    })
}

fn compile_background(
    background: &Background,
    images: &SceneImages,
    full: Rect,
    ops: &mut Vec<DrawOp>,
) {
    match background.mode {
        BackgroundMode::Solid => ops.push(DrawOp::FillRect {
            rect: full,
            paint: FillPaint::Solid(background.primary),
        }),
        BackgroundMode::Gradient => ops.push(DrawOp::FillRect {
            rect: full,
            paint: FillPaint::LinearGradient {
                start: Point::new(0.0, full.y0),
                end: Point::new(0.0, full.y1),
                stops: vec![
                    (0.0, background.primary),
                    (GRADIENT_BAND_END, background.primary),
                    (1.0, background.secondary),
                ],
            },
        }),
        BackgroundMode::Image => {
            ops.push(DrawOp::FillRect {
                rect: full,
                paint: FillPaint::Solid(background.primary),
            });
            let Some(img) = &images.background else {
                return;
            };
            let opacity = background.image_opacity.clamp(0.0, 1.0) as f32;
            if opacity <= 0.0 || img.width == 0 || img.height == 0 {
                return;
            }
            ops.push(DrawOp::Image {
                slot: ImageSlot::Background,
                transform: contain_fit(f64::from(img.width), f64::from(img.height), full),
                opacity,
            });
        }
    }
}

/// Uniformly scale an `iw x ih` image to fit inside `frame`, centered.
pub fn contain_fit(iw: f64, ih: f64, frame: Rect) -> Affine {
    let s = (frame.width() / iw).min(frame.height() / ih);
    let dx = frame.x0 + (frame.width() - iw * s) / 2.0;
    let dy = frame.y0 + (frame.height() - ih * s) / 2.0;
    Affine::translate((dx, dy)) * Affine::scale(s)
}

fn compile_sprite(
    sprite: &Sprite,
    images: &SceneImages,
    full: Rect,
    mapping: SpaceMapping,
    ops: &mut Vec<DrawOp>,
) {
    let img = &images.sprite;
    if sprite.transform.is_invisible() || img.width == 0 || img.height == 0 {
        return;
    }
    let (iw, ih) = (f64::from(img.width), f64::from(img.height));
    let h = full.height() * SPRITE_HEIGHT_FRACTION;
    let w = h * iw / ih;

    let anchor = mapping.to_target_point(sprite.position);
    let transform = sprite.transform.to_affine(anchor)
        * Affine::translate((-w / 2.0, -h / 2.0))
        * Affine::scale_non_uniform(w / iw, h / ih);
    ops.push(DrawOp::Image {
        slot: ImageSlot::Sprite,
        transform,
        opacity: sprite.transform.opacity_f32(),
    });
}

fn compile_text(
    layer: &TextLayer,
    mapping: SpaceMapping,
    measure: &mut dyn TextMeasure,
) -> LayercompResult<Option<DrawOp>> {
    let style = &layer.style;
    if style.transform.is_invisible() {
        return Ok(None);
    }

    let font = FontSpec::new(
        export_font_family(&style.font_family),
        mapping.to_target(style.font_size),
    );
    let block = layout_text(
        &layer.message,
        &font,
        mapping.to_target(TEXT_WRAP_WIDTH),
        measure,
    )?;

    let chip = (style.background_opacity > 0.0).then(|| TextChip {
        shape: RoundedRect::from_rect(
            block.chip_rect(mapping.to_target(CHIP_PADDING)),
            mapping.to_target(CHIP_RADIUS),
        ),
        color: style.background_color.with_opacity(style.background_opacity),
    });

    let lines = block
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| PlannedLine {
            text: line.text.clone(),
            center: Point::new(0.0, block.line_center_y(i)),
        })
        .collect();

    Ok(Some(DrawOp::TextBlock {
        transform: style.transform.to_affine(mapping.to_target_point(layer.position)),
        opacity: style.transform.opacity_f32(),
        chip,
        lines,
        color: style.color,
        font,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
