use figrbx_lib::error::ErrorCategory;
use figrbx_lib::CompileError;

#[test]
fn config_error_display_includes_message() {
    let err = CompileError::Config("missing creator".to_string());

    assert_eq!(format!("{}", err), "Configuration error: missing creator");
}

#[test]
fn io_error_display_wraps_source() {
    let io_err = std::io::Error::other("disk full");
    let err: CompileError = io_err.into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("IO error: "));
    assert!(rendered.contains("disk full"));
}

#[test]
fn upload_helper_includes_status_and_message() {
    let err = CompileError::upload(Some(reqwest::StatusCode::TOO_MANY_REQUESTS), "slow down");

    assert_eq!(
        format!("{}", err),
        "Upload failed (status: Some(429)): slow down"
    );
    assert_eq!(err.to_payload().category, ErrorCategory::Upload);
}

#[test]
fn upload_helper_handles_missing_status() {
    let err = CompileError::upload(None, "operation failed");

    assert_eq!(
        format!("{}", err),
        "Upload failed (status: None): operation failed"
    );
}

#[test]
fn malformed_helper_uses_message() {
    let err = CompileError::malformed("manifest has no root node");

    assert_eq!(
        format!("{}", err),
        "Malformed manifest: manifest has no root node"
    );
    assert_eq!(err.to_payload().category, ErrorCategory::Manifest);
}

#[test]
fn invalid_raw_content_names_the_hash() {
    let err = CompileError::InvalidRawContent {
        hash: "deadbeef".into(),
        message: "not base64".into(),
    };

    assert_eq!(
        format!("{}", err),
        "Raw content for content hash deadbeef is not a supported image: not base64"
    );
}
