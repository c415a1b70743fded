use sanskriti::{Result, SanskritiError};

#[test]
fn test_error_display() {
    let err = SanskritiError::UnknownDataset("bollywood".to_string());
    assert!(err.to_string().contains("bollywood"));
}

#[test]
fn test_api_error_display() {
    let err = SanskritiError::Api {
        status: 422,
        code: "002003".into(),
        message: "Object does not exist".into(),
    };
    let text = err.to_string();
    assert!(text.contains("422"));
    assert!(text.contains("002003"));
    assert!(text.contains("Object does not exist"));
}

#[test]
fn test_statement_timeout_display() {
    let err = SanskritiError::StatementTimeout {
        handle: "01b2-slow".into(),
        attempts: 60,
    };
    assert_eq!(
        err.to_string(),
        "statement 01b2-slow still running after 60 polls"
    );
}

#[test]
fn test_json_error_conversion() {
    let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
    let err: SanskritiError = parse.unwrap_err().into();
    assert!(matches!(err, SanskritiError::Json(_)));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(SanskritiError::Unsupported)
    }
    assert!(returns_error().is_err());
}
