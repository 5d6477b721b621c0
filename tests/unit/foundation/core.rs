use super::*;

#[test]
fn parse_hex_forms() {
    assert_eq!(Rgba8::parse_hex("#295144").unwrap(), Rgba8::rgb(0x29, 0x51, 0x44));
    assert_eq!(Rgba8::parse_hex("fff").unwrap(), Rgba8::WHITE);
    assert_eq!(
        Rgba8::parse_hex("#00000080").unwrap(),
        Rgba8::new(0, 0, 0, 0x80)
    );
    assert!(Rgba8::parse_hex("#12345").is_err());
    assert!(Rgba8::parse_hex("#gg0000").is_err());
    assert!(Rgba8::parse_hex("#ééé").is_err());
}

#[test]
fn parse_hex_rejects_signed_digits() {
    for bad in ["#+1+2+3", "+f+f+f", "#-12345", "#12 456"] {
        let err = Rgba8::parse_hex(bad).unwrap_err();
        assert!(matches!(err, LayercompError::Validation(_)), "{bad}");
    }
    assert!(serde_json::from_str::<Rgba8>("\"+f+f+f\"").is_err());
}

#[test]
fn hex_serde_uses_strings() {
    let c = Rgba8::rgb(0x1a, 0x38, 0x30);
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "\"#1a3830\"");
    let back: Rgba8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
    assert!(serde_json::from_str::<Rgba8>("\"nope\"").is_err());
}

#[test]
fn with_opacity_scales_alpha_only() {
    let c = Rgba8::rgb(10, 20, 30).with_opacity(0.5);
    assert_eq!((c.r, c.g, c.b), (10, 20, 30));
    assert_eq!(c.a, 128);
    assert_eq!(Rgba8::WHITE.with_opacity(f64::NAN).a, 0);
    assert_eq!(Rgba8::WHITE.with_opacity(3.0).a, 255);
}

#[test]
fn premultiply_opaque_is_identity() {
    let p = Rgba8::rgb(1, 2, 3).premultiplied();
    assert_eq!(p.to_array(), [1, 2, 3, 255]);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
