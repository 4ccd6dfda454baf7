use thiserror::Error;

/// Errors raised by this crate's own operations (config file access).
///
/// Per-turn failures never reach this type: subsystem crates define their
/// own errors (`LlmError`, `AssistantError`, `ToolError` below) and the
/// orchestrator absorbs them into degraded outcomes instead of propagating.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FinpilotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for FinpilotError {
    fn from(err: toml::de::Error) -> Self {
        FinpilotError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for FinpilotError {
    fn from(err: toml::ser::Error) -> Self {
        FinpilotError::Config(err.to_string())
    }
}

/// A specialized `Result` type for Finpilot operations.
pub type Result<T> = std::result::Result<T, FinpilotError>;

/// Error raised by a single tool invocation.
///
/// Tool failures are captured per tool and never abort the turn; the
/// executor converts them into failure outcomes keyed by tool name.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Upstream data API error: {0}")]
    Upstream(String),

    #[error("Tool timed out after {0} seconds")]
    Timeout(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FinpilotError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FinpilotError = io_err.into();
        assert!(matches!(err, FinpilotError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let parse: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        let err: FinpilotError = parse.unwrap_err().into();
        assert!(matches!(err, FinpilotError::Config(_)));
    }

    #[test]
    fn test_error_from_toml_ser() {
        // toml cannot serialize a bare scalar at the top level.
        let err: FinpilotError = toml::to_string(&42).unwrap_err().into();
        assert!(matches!(err, FinpilotError::Config(_)));
    }

    #[test]
    fn test_tool_error_display() {
        assert_eq!(
            ToolError::InvalidParams("missing symbol".to_string()).to_string(),
            "Invalid parameters: missing symbol"
        );
        assert_eq!(
            ToolError::Timeout(8).to_string(),
            "Tool timed out after 8 seconds"
        );
        assert!(ToolError::Upstream("502".to_string())
            .to_string()
            .contains("502"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }
        fn returns_err() -> Result<i32> {
            Err(FinpilotError::Config("fail".to_string()))
        }
        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }
}
