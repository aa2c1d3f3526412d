use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FrameSeqError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FrameSeqError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        FrameSeqError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(FrameSeqError::io("x").to_string().contains("io error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FrameSeqError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
