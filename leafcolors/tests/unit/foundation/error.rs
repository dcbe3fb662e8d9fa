use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LeafError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LeafError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(LeafError::http("x").to_string().contains("http error:"));
    assert!(LeafError::image("x").to_string().contains("image error:"));
    assert!(
        LeafError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(LeafError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LeafError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn io_at_keeps_kind_and_names_path() {
    let base = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err = LeafError::io_at(std::path::Path::new("frames/x.svg"), base);
    match err {
        LeafError::Io(e) => {
            assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            assert!(e.to_string().contains("frames/x.svg"));
        }
        other => panic!("expected Io, got {other:?}"),
    }
}
