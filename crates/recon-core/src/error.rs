use thiserror::Error;

/// Top-level error type for Recon.
///
/// Subsystem crates define their own error types and convert from
/// `ReconError` so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReconError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<toml::de::Error> for ReconError {
    fn from(err: toml::de::Error) -> Self {
        ReconError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ReconError {
    fn from(err: toml::ser::Error) -> Self {
        ReconError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ReconError {
    fn from(err: serde_json::Error) -> Self {
        ReconError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Recon operations.
pub type Result<T> = std::result::Result<T, ReconError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(ReconError, &str)> = vec![
            (
                ReconError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                ReconError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
            (
                ReconError::Validation("email is required".to_string()),
                "Validation failed: email is required",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err: ReconError = io_err.into();
        match &err {
            ReconError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("Expected Io variant"),
        }
        assert!(err.to_string().starts_with("I/O error:"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let recon_err: ReconError = err.unwrap_err().into();
        assert!(matches!(recon_err, ReconError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let recon_err: ReconError = err.unwrap_err().into();
        assert!(matches!(recon_err, ReconError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(value.to_string())
        }

        assert_eq!(inner().unwrap(), "42");
    }
}
