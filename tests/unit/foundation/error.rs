use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FaceError::malformed_image("x")
            .to_string()
            .contains("malformed image:")
    );
    assert!(
        FaceError::asset_resolution("x")
            .to_string()
            .contains("asset resolution error:")
    );
    assert!(
        FaceError::timer_scheduling("x")
            .to_string()
            .contains("timer scheduling error:")
    );
    assert!(
        FaceError::missing_field("max-temp")
            .to_string()
            .contains("missing field: max-temp")
    );
    assert!(FaceError::NullAsset.to_string().contains("null asset"));
}

#[test]
fn kind_names_each_variant() {
    assert_eq!(FaceError::NullAsset.kind(), "null_asset");
    assert_eq!(FaceError::malformed_image("x").kind(), "malformed_image");
    assert_eq!(FaceError::asset_resolution("x").kind(), "asset_resolution");
    assert_eq!(FaceError::validation("x").kind(), "validation");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FaceError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), "other");
}
