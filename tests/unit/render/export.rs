use super::*;
use crate::assets::loader::MemoryImageLoader;

fn tiny(data: Vec<u8>) -> RasterImage {
    RasterImage {
        width: 2,
        height: 1,
        data,
    }
}

#[test]
fn default_settings_are_1200_over_500() {
    let s = ExportSettings::default();
    assert_eq!((s.width, s.height), (1200, 1200));
    assert_eq!(s.logical_extent, 500.0);
    assert!((s.mapping().ratio() - 2.4).abs() < 1e-12);
    s.validate().unwrap();
}

#[test]
fn settings_validation() {
    assert!(ExportSettings::square(0).validate().is_err());
    assert!(ExportSettings::square(70_000).validate().is_err());
    assert!(ExportSettings::square(u32::from(u16::MAX)).validate().is_ok());
    let nan = ExportSettings {
        logical_extent: f64::NAN,
        ..ExportSettings::default()
    };
    assert!(nan.validate().is_err());
    let neg = ExportSettings {
        logical_extent: -1.0,
        ..ExportSettings::default()
    };
    assert!(neg.validate().is_err());
}

#[test]
fn pixel_access_is_bounds_checked() {
    let img = tiny(vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(img.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(img.pixel(2, 0), None);
    assert_eq!(img.pixel(0, 1), None);
}

#[test]
fn fingerprint_tracks_pixels_and_size() {
    let a = tiny(vec![0; 8]);
    let b = tiny(vec![0; 8]);
    let mut c = tiny(vec![0; 8]);
    c.data[5] = 1;
    let d = RasterImage {
        width: 1,
        height: 2,
        data: vec![0; 8],
    };
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
    assert_ne!(a.fingerprint(), d.fingerprint());
}

#[test]
fn png_is_straight_alpha() {
    let img = tiny(vec![64, 0, 0, 128, 0, 0, 0, 0]);
    let png = img.encode_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2, 1));
    assert_eq!(decoded.get_pixel(0, 0).0, [128, 0, 0, 128]);
    assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 0, 0]);

    let broken = tiny(vec![0; 3]);
    assert!(matches!(broken.encode_png().unwrap_err(), LayercompError::Render(_)));
}

#[test]
fn second_export_is_rejected_while_busy() {
    let exporter = Exporter::new(ExportSettings::square(8));
    let session = Session::with_seed(1);
    let loader = MemoryImageLoader::new();
    let mut text = RasterTextEngine::new();

    let guard = exporter.try_begin().unwrap();
    assert!(exporter.is_busy());
    let err = exporter.export(&session, &loader, &mut text).unwrap_err();
    assert!(matches!(err, LayercompError::ExportBusy));
    drop(guard);
    assert!(!exporter.is_busy());

    // The flag is released even when the export itself fails.
    let err = exporter.export(&session, &loader, &mut text).unwrap_err();
    assert!(matches!(err, LayercompError::ResourceLoad(_)));
    assert!(!exporter.is_busy());
}
