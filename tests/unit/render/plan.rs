use std::sync::Arc;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::scene::model::{ImageRef, TextId, TextStyle};
use crate::scene::session::Session;
use crate::text::layout::ApproxMeasure;

fn solid_image(width: u32, height: u32) -> PreparedImage {
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(vec![255; width as usize * height as usize * 4]),
    }
}

fn images(sprite_w: u32, sprite_h: u32) -> SceneImages {
    SceneImages {
        background: None,
        sprite: solid_image(sprite_w, sprite_h),
    }
}

fn text_layer(id: &str, message: &str) -> TextLayer {
    TextLayer {
        id: TextId(id.to_string()),
        message: message.to_string(),
        position: Point::new(250.0, 250.0),
        style: TextStyle::with_family("Roboto"),
    }
}

fn compile(snapshot: &SceneSnapshot, images: &SceneImages) -> RenderPlan {
    let mut measure = ApproxMeasure::default();
    compile_scene(snapshot, images, &mut measure, &ExportSettings::default()).unwrap()
}

fn text_ids(plan: &RenderPlan) -> Vec<String> {
    plan.ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::TextBlock { lines, .. } => Some(lines[0].text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn sprite_scenario_geometry() {
    let snapshot = SceneSnapshot::default();
    let plan = compile(&snapshot, &images(200, 400));

    let DrawOp::Image {
        slot: ImageSlot::Sprite,
        transform,
        opacity,
    } = &plan.ops[1]
    else {
        panic!("second op must be the sprite: {:?}", plan.ops[1]);
    };
    assert_eq!(*opacity, 1.0);

    // 200x400 source: 600px tall, 300px wide, centered on (336, 288).
    let top_left = *transform * Point::new(0.0, 0.0);
    let bottom_right = *transform * Point::new(200.0, 400.0);
    assert!((top_left.x - (336.0 - 150.0)).abs() < 1e-9);
    assert!((top_left.y - (288.0 - 300.0)).abs() < 1e-9);
    assert!((bottom_right.x - (336.0 + 150.0)).abs() < 1e-9);
    assert!((bottom_right.y - (288.0 + 300.0)).abs() < 1e-9);
}

#[test]
fn flipped_sprite_mirrors_around_anchor() {
    let mut snapshot = SceneSnapshot::default();
    snapshot.sprite.transform.flip_x = true;
    let plan = compile(&snapshot, &images(100, 100));
    let DrawOp::Image { transform, .. } = &plan.ops[1] else {
        panic!("expected sprite op");
    };
    let p = *transform * Point::new(0.0, 0.0);
    assert!((p.x - (336.0 + 300.0)).abs() < 1e-9);
    assert!((p.y - (288.0 - 300.0)).abs() < 1e-9);
}

#[test]
fn zero_scale_and_zero_opacity_layers_are_skipped() {
    let mut snapshot = SceneSnapshot::default();
    snapshot.sprite.transform.scale = 0.0;
    let mut hidden = text_layer("a", "hidden");
    hidden.style.transform.opacity = 0.0;
    snapshot.texts.push(hidden);

    let plan = compile(&snapshot, &images(10, 10));
    assert_eq!(plan.ops.len(), 1);
    assert!(matches!(plan.ops[0], DrawOp::FillRect { .. }));
}

#[test]
fn export_order_ignores_active_selection() {
    let mut session = Session::with_seed(3);
    let ids: Vec<_> = (0..3).map(|_| session.add_text()).collect();
    for (i, id) in ids.iter().enumerate() {
        session
            .update_text(
                id,
                &crate::scene::model::TextPatch {
                    message: Some(format!("t{i}")),
                    ..Default::default()
                },
            )
            .unwrap();
    }
    session.set_active_text(Some(&ids[0]));

    let plan = compile(&session.snapshot(), &images(10, 10));
    assert!(matches!(plan.ops[0], DrawOp::FillRect { .. }));
    assert!(matches!(plan.ops[1], DrawOp::Image { slot: ImageSlot::Sprite, .. }));
    assert_eq!(text_ids(&plan), vec!["t0", "t1", "t2"]);
}

#[test]
fn gradient_has_flat_primary_band() {
    let mut snapshot = SceneSnapshot::default();
    snapshot.background.mode = BackgroundMode::Gradient;
    let plan = compile(&snapshot, &images(10, 10));
    let DrawOp::FillRect {
        paint: FillPaint::LinearGradient { start, end, stops },
        ..
    } = &plan.ops[0]
    else {
        panic!("expected gradient fill");
    };
    assert_eq!(*start, Point::new(0.0, 0.0));
    assert_eq!(*end, Point::new(0.0, 1200.0));
    let bg = &snapshot.background;
    assert_eq!(
        stops,
        &vec![(0.0, bg.primary), (0.35, bg.primary), (1.0, bg.secondary)]
    );
}

#[test]
fn image_background_is_contain_fit_over_primary() {
    let mut snapshot = SceneSnapshot::default();
    snapshot.background.mode = BackgroundMode::Image;
    snapshot.background.image = Some(ImageRef::new("bg.png"));
    snapshot.background.image_opacity = 0.5;
    let imgs = SceneImages {
        background: Some(solid_image(400, 200)),
        sprite: solid_image(10, 10),
    };
    let plan = compile(&snapshot, &imgs);

    assert!(matches!(
        &plan.ops[0],
        DrawOp::FillRect { paint: FillPaint::Solid(c), .. } if *c == snapshot.background.primary
    ));
    let DrawOp::Image {
        slot: ImageSlot::Background,
        transform,
        opacity,
    } = &plan.ops[1]
    else {
        panic!("expected background image op");
    };
    assert_eq!(*opacity, 0.5);
    // 400x200 fits as 1200x600, letterboxed vertically.
    let tl = *transform * Point::new(0.0, 0.0);
    let br = *transform * Point::new(400.0, 200.0);
    assert_eq!((tl.x, tl.y), (0.0, 300.0));
    assert_eq!((br.x, br.y), (1200.0, 900.0));
}

#[test]
fn image_mode_without_image_is_solid() {
    let mut snapshot = SceneSnapshot::default();
    snapshot.background.mode = BackgroundMode::Image;
    let plan = compile(&snapshot, &images(10, 10));
    assert!(matches!(plan.ops[0], DrawOp::FillRect { .. }));
    assert!(matches!(plan.ops[1], DrawOp::Image { slot: ImageSlot::Sprite, .. }));
}

#[test]
fn text_block_is_scaled_and_chipped() {
    let mut snapshot = SceneSnapshot::default();
    let mut layer = text_layer("a", "ab\n\ncd");
    layer.style.background_opacity = 0.5;
    layer.style.font_family = "Playfair Display".to_string();
    snapshot.texts.push(layer);

    let plan = compile(&snapshot, &images(10, 10));
    let DrawOp::TextBlock {
        transform,
        chip,
        lines,
        font,
        ..
    } = &plan.ops[2]
    else {
        panic!("expected text op");
    };

    // 24 logical px at 2.4x.
    assert!((font.size_px - 57.6).abs() < 1e-9);
    assert_eq!(font.family, "Playfair Display, Georgia, serif");
    assert_eq!(*transform * Point::ZERO, Point::new(600.0, 600.0));

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1].text, "");
    let line_h = 57.6 * 1.2;
    assert!((lines[0].center.y + line_h).abs() < 1e-9);
    assert!(lines[1].center.y.abs() < 1e-9);

    let chip = chip.as_ref().unwrap();
    assert_eq!(chip.color.a, 128);
    let r = chip.shape.rect();
    let pad = 16.0 * 2.4;
    let text_w = 2.0 * 57.6 * 0.6;
    assert!((r.width() - (text_w + 2.0 * pad)).abs() < 1e-9);
    assert!((r.height() - (3.0 * line_h + 2.0 * pad)).abs() < 1e-9);
}

#[test]
fn transparent_chip_is_omitted() {
    let mut snapshot = SceneSnapshot::default();
    snapshot.texts.push(text_layer("a", "x"));
    let plan = compile(&snapshot, &images(10, 10));
    let DrawOp::TextBlock { chip, .. } = &plan.ops[2] else {
        panic!("expected text op");
    };
    assert!(chip.is_none());
}

#[test]
fn invalid_settings_are_rejected() {
    let mut measure = ApproxMeasure::default();
    let bad = ExportSettings {
        width: 0,
        ..ExportSettings::default()
    };
    assert!(compile_scene(&SceneSnapshot::default(), &images(1, 1), &mut measure, &bad).is_err());
}
