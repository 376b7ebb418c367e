use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PaintMaskError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PaintMaskError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        PaintMaskError::render("x")
            .to_string()
            .contains("render error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PaintMaskError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
