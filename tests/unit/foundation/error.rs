use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SegmarkError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(SegmarkError::codec("x").to_string().contains("codec error:"));
    assert!(SegmarkError::render("x").to_string().contains("render error:"));
    assert!(
        SegmarkError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        SegmarkError::service("x")
            .to_string()
            .contains("segmentation service error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SegmarkError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_variant() {
    let err: SegmarkError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, SegmarkError::Serde(_)));
}
