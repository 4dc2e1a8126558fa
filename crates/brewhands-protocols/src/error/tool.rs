//! Tool execution errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown operation: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Parameter validation failed: {0}")]
    ValidationFailed(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Tool execution timed out after {0} seconds")]
    Timeout(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_operation() {
        let err = ToolError::NotFound("order_teleport".to_string());
        assert!(err.to_string().contains("Unknown operation"));
        assert!(err.to_string().contains("order_teleport"));
    }

    #[test]
    fn test_execution_failed_carries_cause() {
        let err = ToolError::ExecutionFailed("store locator never loaded".to_string());
        assert!(err.to_string().contains("store locator never loaded"));
    }

    #[test]
    fn test_timeout_mentions_seconds() {
        let err = ToolError::Timeout(300);
        assert!(err.to_string().contains("300"));
    }

    #[test]
    fn test_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ToolError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }
}
