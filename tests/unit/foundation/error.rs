use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScreenError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ScreenError::asset("x").to_string().contains("asset error:"));
    assert!(ScreenError::font("x").to_string().contains("font error:"));
    assert!(ScreenError::render("x").to_string().contains("render error:"));
    assert!(
        ScreenError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScreenError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
