use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::invalid_range("x")
            .to_string()
            .contains("invalid range:")
    );
    assert!(
        ReelError::degenerate("x")
            .to_string()
            .contains("degenerate timeline:")
    );
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ReelError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        ReelError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        ReelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn configuration_errors_are_classified() {
    assert!(ReelError::invalid_range("x").is_configuration());
    assert!(ReelError::degenerate("x").is_configuration());
    assert!(ReelError::animation("x").is_configuration());
    assert!(!ReelError::validation("x").is_configuration());
    assert!(!ReelError::evaluation("x").is_configuration());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: ReelError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, ReelError::Serde(_)));
}
