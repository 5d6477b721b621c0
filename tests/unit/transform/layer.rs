use super::*;

fn approx_pt(a: Point, b: Point) {
    assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
}

#[test]
fn effective_scale_folds_flip_signs() {
    let mut t = LayerTransform {
        scale: 1.5,
        ..LayerTransform::default()
    };
    assert_eq!(t.effective_scale(), Vec2::new(1.5, 1.5));

    t.flip_x = true;
    assert_eq!(t.effective_scale(), Vec2::new(-1.5, 1.5));
    t.flip_y = true;
    assert_eq!(t.effective_scale(), Vec2::new(-1.5, -1.5));

    t.flip_x = !t.flip_x;
    t.flip_y = !t.flip_y;
    assert_eq!(t.effective_scale(), Vec2::new(1.5, 1.5));
}

#[test]
fn to_affine_is_translate_rotate_scale() {
    let t = LayerTransform {
        rotation_deg: 90.0,
        scale: 2.0,
        flip_x: true,
        ..LayerTransform::default()
    };
    let a = t.to_affine(Point::new(100.0, 50.0));
    // local (1,0) -> flip-scale (-2,0) -> rotate 90deg (0,-2) -> translate.
    approx_pt(a * Point::new(1.0, 0.0), Point::new(100.0, 48.0));
    approx_pt(a * Point::ZERO, Point::new(100.0, 50.0));
}

#[test]
fn identity_transform_is_pure_translation() {
    let a = LayerTransform::default().to_affine(Point::new(3.0, 4.0));
    assert_eq!(a, Affine::translate((3.0, 4.0)));
}

#[test]
fn zero_scale_is_legal_and_invisible() {
    let t = LayerTransform {
        scale: 0.0,
        ..LayerTransform::default()
    };
    t.validate().unwrap();
    assert!(t.is_invisible());
    let a = t.to_affine(Point::new(10.0, 10.0));
    approx_pt(a * Point::new(40.0, -7.0), Point::new(10.0, 10.0));
}

#[test]
fn patch_rejects_non_finite_atomically() {
    let base = LayerTransform::default();
    let patch = TransformPatch {
        rotation_deg: Some(45.0),
        scale: Some(f64::NAN),
        ..TransformPatch::default()
    };
    let err = patch.apply_to(&base).unwrap_err();
    assert!(err.to_string().contains("scale"));

    let neg = TransformPatch {
        scale: Some(-1.0),
        ..TransformPatch::default()
    };
    assert!(neg.apply_to(&base).is_err());
}

#[test]
fn patch_clamps_opacity_and_keeps_untouched_fields() {
    let base = LayerTransform {
        rotation_deg: 12.0,
        ..LayerTransform::default()
    };
    let out = TransformPatch {
        opacity: Some(1.7),
        flip_y: Some(true),
        ..TransformPatch::default()
    }
    .apply_to(&base)
    .unwrap();
    assert_eq!(out.opacity, 1.0);
    assert!(out.flip_y);
    assert_eq!(out.rotation_deg, 12.0);
}
