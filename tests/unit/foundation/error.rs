use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LayercompError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LayercompError::resource("x")
            .to_string()
            .contains("resource load failure:")
    );
    assert!(
        LayercompError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert_eq!(
        LayercompError::ExportBusy.to_string(),
        "export already in progress"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LayercompError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
