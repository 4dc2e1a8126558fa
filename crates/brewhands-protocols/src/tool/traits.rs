//! Tool trait definition.

use async_trait::async_trait;

use super::{ToolContext, ToolDefinition, ToolResult};
use crate::error::ToolError;
use crate::types::RiskLevel;

/// Core trait for tools.
///
/// Tools are executable units the dispatcher invokes on behalf of a caller.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool definition.
    fn definition(&self) -> &ToolDefinition;

    /// Execute the tool with the given parameters.
    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError>;

    /// Validate the parameters before execution.
    fn validate(&self, params: &serde_json::Value) -> Result<(), ToolError> {
        let definition = self.definition();
        if let Some(schema) = &definition.parameters_schema {
            if schema.get("type") == Some(&serde_json::json!("object")) && !params.is_object() {
                return Err(ToolError::ValidationFailed(
                    "Parameters must be an object".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Returns the risk level of this tool.
    fn risk_level(&self) -> RiskLevel {
        self.definition().risk_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct MockTool {
        definition: ToolDefinition,
    }

    impl MockTool {
        fn new() -> Self {
            Self {
                definition: ToolDefinition::new("mock_tool", "Mock Tool", "A mock tool"),
            }
        }

        fn with_schema(schema: serde_json::Value) -> Self {
            Self {
                definition: ToolDefinition::new("mock_tool", "Mock Tool", "A mock tool")
                    .with_parameters_schema(schema),
            }
        }
    }

    #[async_trait]
    impl Tool for MockTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            _params: serde_json::Value,
            _ctx: ToolContext,
        ) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::success("executed"))
        }
    }

    #[test]
    fn test_validate_without_schema() {
        let tool = MockTool::new();
        assert!(tool.validate(&serde_json::json!({"any": 1})).is_ok());
    }

    #[test]
    fn test_validate_object_schema_rejects_non_object() {
        let tool = MockTool::with_schema(serde_json::json!({"type": "object"}));
        assert!(tool.validate(&serde_json::json!("not an object")).is_err());
        assert!(tool.validate(&serde_json::json!([1, 2])).is_err());
        assert!(tool.validate(&serde_json::Value::Null).is_err());
    }

    #[test]
    fn test_validate_object_schema_accepts_object() {
        let tool = MockTool::with_schema(serde_json::json!({"type": "object"}));
        assert!(tool.validate(&serde_json::json!({})).is_ok());
    }

    #[test]
    fn test_default_risk_level() {
        let tool = MockTool::new();
        assert_eq!(tool.risk_level(), RiskLevel::Low);
    }

    #[tokio::test]
    async fn test_execute() {
        let tool = MockTool::new();
        let ctx = ToolContext::new(PathBuf::from("/tmp"));
        let result = tool.execute(serde_json::json!({}), ctx).await.unwrap();
        assert!(result.success);
        assert_eq!(result.content, "executed");
    }
}
