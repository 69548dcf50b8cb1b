use thiserror::Error;

/// Top-level error type for the Carebot system.
///
/// Subsystem crates define their own error types and implement
/// `From<CarebotError>` so that the `?` operator works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CarebotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing API key: environment variable {var} is not set")]
    MissingApiKey { var: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for CarebotError {
    fn from(err: toml::de::Error) -> Self {
        CarebotError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CarebotError {
    fn from(err: toml::ser::Error) -> Self {
        CarebotError::Config(err.to_string())
    }
}

/// A specialized `Result` type for Carebot operations.
pub type Result<T> = std::result::Result<T, CarebotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CarebotError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_missing_api_key_names_variable() {
        let err = CarebotError::MissingApiKey {
            var: "OPENAI_API_KEY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing API key: environment variable OPENAI_API_KEY is not set"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = CarebotError::Api("bind failed".to_string());
        assert_eq!(err.to_string(), "API error: bind failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CarebotError = io_err.into();
        assert!(matches!(err, CarebotError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let carebot_err: CarebotError = err.unwrap_err().into();
        assert!(matches!(carebot_err, CarebotError::Config(_)));
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
