//! Tool execution context.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Context for tool execution.
///
/// The dispatcher creates one context per invocation; tools treat it as
/// read-mostly. There is exactly one logical session per process, so the
/// context carries a correlation id for tracing rather than a session id.
#[derive(Clone)]
pub struct ToolContext {
    /// Correlation ID for tracing.
    pub correlation_id: String,

    /// Working directory for file operations.
    pub work_dir: std::path::PathBuf,

    /// Additional context data.
    pub data: HashMap<String, serde_json::Value>,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(work_dir: std::path::PathBuf) -> Self {
        Self {
            correlation_id: uuid::Uuid::new_v4().to_string(),
            work_dir,
            data: HashMap::new(),
        }
    }

    /// Get a value from the context data.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set a value in the context data.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.data.insert(key.into(), v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_context_has_correlation_id() {
        let ctx = ToolContext::new(PathBuf::from("/tmp"));
        assert!(!ctx.correlation_id.is_empty());
    }

    #[test]
    fn test_context_data_round_trip() {
        let mut ctx = ToolContext::new(PathBuf::from("/tmp"));
        ctx.set("location", "Polk Street");
        let value: Option<String> = ctx.get("location");
        assert_eq!(value.as_deref(), Some("Polk Street"));
    }

    #[test]
    fn test_context_get_missing_key() {
        let ctx = ToolContext::new(PathBuf::from("/tmp"));
        let value: Option<String> = ctx.get("absent");
        assert!(value.is_none());
    }
}
