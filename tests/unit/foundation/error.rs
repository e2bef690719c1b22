use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SceneLinkError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SceneLinkError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        SceneLinkError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn not_ancestor_names_the_id() {
    let err = SceneLinkError::not_ancestor("stranger");
    assert_eq!(
        err.to_string(),
        "rootMaterialId is not an ancestor material: \"stranger\""
    );
}

#[test]
fn depth_exceeded_reports_limit() {
    let err = SceneLinkError::DepthExceeded { limit: 8 };
    assert_eq!(err.to_string(), "tree depth exceeds the limit of 8");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SceneLinkError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
