use std::sync::Arc;

use vello_cpu::kurbo::Shape;

use crate::{
    assets::decode::PreparedImage,
    assets::loader::SceneImages,
    foundation::core::{Affine, Canvas, Rgba8},
    foundation::error::{LayercompError, LayercompResult},
    render::export::RasterImage,
    render::plan::{DrawOp, FillPaint, ImageSlot, PlannedLine, RenderPlan, TextChip},
    text::layout::FontSpec,
    text::shaper::RasterTextEngine,
};

/// Tolerance used when flattening chip outlines.
const PATH_TOLERANCE: f64 = 0.1;

/// Image paints for the current plan, converted once per export.
struct ScenePaints {
    background: Option<vello_cpu::Image>,
    sprite: vello_cpu::Image,
}

impl ScenePaints {
    fn new(images: &SceneImages) -> LayercompResult<Self> {
        Ok(Self {
            background: images.background.as_ref().map(image_paint).transpose()?,
            sprite: image_paint(&images.sprite)?,
        })
    }

    fn get(&self, slot: ImageSlot) -> LayercompResult<&vello_cpu::Image> {
        match slot {
            ImageSlot::Sprite => Ok(&self.sprite),
            ImageSlot::Background => self
                .background
                .as_ref()
                .ok_or_else(|| LayercompError::render("plan draws a background image that was not loaded")),
        }
    }
}

/// Rasterize a compiled plan with `vello_cpu`.
///
/// Text lines are re-shaped with `text`, which must be the engine that measured them during
/// compilation, so drawn widths match the wrap decisions.
pub fn execute_plan(
    plan: &RenderPlan,
    images: &SceneImages,
    text: &mut RasterTextEngine,
) -> LayercompResult<RasterImage> {
    let (width, height) = surface_size(plan.canvas)?;
    let paints = ScenePaints::new(images)?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    let [r, g, b, a] = plan.clear_rgba;
    if a > 0 {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));
    }
    for op in &plan.ops {
        draw_op(&mut ctx, op, &paints, text)?;
    }

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(RasterImage {
        width: plan.canvas.width,
        height: plan.canvas.height,
        data: pixmap.data_as_u8_slice().to_vec(),
    })
}

fn surface_size(canvas: Canvas) -> LayercompResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| LayercompError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| LayercompError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(LayercompError::render("surface must be non-empty"));
    }
    Ok((w, h))
}

fn draw_op(
    ctx: &mut vello_cpu::RenderContext,
    op: &DrawOp,
    paints: &ScenePaints,
    text: &mut RasterTextEngine,
) -> LayercompResult<()> {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match op {
        DrawOp::FillRect { rect, paint } => {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            match paint {
                FillPaint::Solid(c) => ctx.set_paint(color_to_cpu(*c)),
                FillPaint::LinearGradient { start, end, stops } => {
                    let stops: Vec<vello_cpu::peniko::ColorStop> = stops
                        .iter()
                        .map(|(offset, c)| (*offset, color_to_cpu(*c)).into())
                        .collect();
                    let gradient = vello_cpu::peniko::Gradient::new_linear(
                        (start.x, start.y),
                        (end.x, end.y),
                    )
                    .with_stops(stops.as_slice());
                    ctx.set_paint(gradient);
                }
            }
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                rect.x0, rect.y0, rect.x1, rect.y1,
            ));
            Ok(())
        }
        DrawOp::Image {
            slot,
            transform,
            opacity,
        } => {
            let image_paint = paints.get(*slot)?;
            let (w, h) = image_paint_size(image_paint)?;

            ctx.set_transform(affine_to_cpu(*transform));
            ctx.set_paint(image_paint.clone());

            if *opacity < 1.0 {
                ctx.push_opacity_layer(*opacity);
            }
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            if *opacity < 1.0 {
                ctx.pop_layer();
            }
            Ok(())
        }
        DrawOp::TextBlock {
            transform,
            opacity,
            chip,
            lines,
            color,
            font,
        } => {
            ctx.set_transform(affine_to_cpu(*transform));
            if *opacity < 1.0 {
                ctx.push_opacity_layer(*opacity);
            }

            if let Some(chip) = chip {
                draw_chip(ctx, chip);
            }
            ctx.set_paint(color_to_cpu(*color));
            for line in lines {
                draw_line(ctx, *transform, line, font, text)?;
            }

            if *opacity < 1.0 {
                ctx.pop_layer();
            }
            Ok(())
        }
    }
}

fn draw_chip(ctx: &mut vello_cpu::RenderContext, chip: &TextChip) {
    let r = chip.shape.rect();
    let radius = chip.shape.radii().top_left;
    let shape = vello_cpu::kurbo::RoundedRect::new(r.x0, r.y0, r.x1, r.y1, radius);
    ctx.set_paint(color_to_cpu(chip.color));
    ctx.fill_path(&shape.to_path(PATH_TOLERANCE));
}

fn draw_line(
    ctx: &mut vello_cpu::RenderContext,
    block_transform: Affine,
    line: &PlannedLine,
    font: &FontSpec,
    text: &mut RasterTextEngine,
) -> LayercompResult<()> {
    if line.text.is_empty() {
        return Ok(());
    }
    let shaped = text.shape_line(&line.text, font)?;
    // Center the shaped line box on the planned line center.
    let dx = line.center.x - shaped.width / 2.0;
    let dy = line.center.y - shaped.height / 2.0;
    ctx.set_transform(affine_to_cpu(block_transform * Affine::translate((dx, dy))));

    for layout_line in shaped.layout.lines() {
        for item in layout_line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&shaped.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.set_transform(affine_to_cpu(block_transform));
    Ok(())
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_paint(img: &PreparedImage) -> LayercompResult<vello_cpu::Image> {
    let pixmap = image_premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> LayercompResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| LayercompError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| LayercompError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(LayercompError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels: Vec<_> = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn image_paint_size(image: &vello_cpu::Image) -> LayercompResult<(f64, f64)> {
    match &image.image {
        vello_cpu::ImageSource::Pixmap(p) => Ok((f64::from(p.width()), f64::from(p.height()))),
        vello_cpu::ImageSource::OpaqueId(_) => Err(LayercompError::render(
            "cpu renderer does not support opaque image ids",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
