use pipewatch::{Error, Result};

#[test]
fn test_error_display() {
    let err = Error::Config("test error".to_string());
    assert_eq!(format!("{}", err), "Configuration error: test error");
}

#[test]
fn test_error_types() {
    let http_error = Error::Http("connection refused".to_string());
    assert!(format!("{}", http_error).contains("HTTP error"));

    let io_error: Error = std::io::Error::new(std::io::ErrorKind::AddrInUse, "busy").into();
    assert!(format!("{}", io_error).contains("IO error"));

    let json_error: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(json_error, Error::Serialization(_)));
}

#[test]
fn test_result_type() {
    fn returns_ok() -> Result<i32> {
        Ok(42)
    }

    fn returns_err() -> Result<i32> {
        Err(Error::Server("test error".to_string()))
    }

    assert!(returns_ok().is_ok());
    assert!(returns_err().is_err());
}
