//! Tool dispatch over stdin/stdout.
//!
//! One JSON request per line in (`{"op": "...", "args": {...}}`), one JSON
//! result per line out. This layer carries no business logic: it forwards to
//! the registered tool and maps every failure — unknown operation, bad
//! parameters, workflow error, even a panicking tool — to an error result.
//! Only start-up failures are fatal.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::json;
use tokio::io::AsyncBufReadExt;
use tracing::{debug, info, warn};

use brewhands_protocols::error::{ExtensionError, ToolError};
use brewhands_protocols::extension::{Extension, ExtensionContext, ToolRegistryAccess};
use brewhands_protocols::tool::{Tool, ToolContext, ToolResult};
use brewhands_tools_order::{OrderConfig, OrderToolsExtension};

/// One incoming tool invocation.
#[derive(Debug, Deserialize)]
struct ToolRequest {
    op: String,
    #[serde(default)]
    args: serde_json::Value,
}

/// In-process tool registry, in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<Vec<Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn get(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .read()
            .iter()
            .find(|tool| tool.definition().id == id)
            .cloned()
    }

    pub fn list(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.read().clone()
    }
}

impl ToolRegistryAccess for ToolRegistry {
    fn register_tool(&self, tool: Arc<dyn Tool>) -> Result<(), ExtensionError> {
        let id = tool.definition().id.clone();
        let mut tools = self.tools.write();
        if tools.iter().any(|existing| existing.definition().id == id) {
            return Err(ExtensionError::AlreadyRegistered(id));
        }
        tools.push(tool);
        Ok(())
    }

    fn unregister_tool(&self, tool_id: &str) -> Result<(), ExtensionError> {
        self.tools
            .write()
            .retain(|tool| tool.definition().id != tool_id);
        Ok(())
    }
}

async fn initialize_extension(
    config: OrderConfig,
) -> anyhow::Result<(Arc<ToolRegistry>, OrderToolsExtension, PathBuf)> {
    let registry = Arc::new(ToolRegistry::default());
    let work_dir = std::env::current_dir().context("resolving working directory")?;

    let mut extension = OrderToolsExtension::with_config(config);
    extension
        .initialize(ExtensionContext::new(
            json!({}),
            registry.clone(),
            work_dir.clone(),
        ))
        .await
        .context("initializing order tools")?;

    Ok((registry, extension, work_dir))
}

/// Run the dispatch loop until stdin closes.
pub async fn run(config: OrderConfig) -> anyhow::Result<()> {
    let (registry, extension, work_dir) = initialize_extension(config).await?;
    info!("Serving {} tools on stdio", registry.list().len());

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = dispatch(&registry, &work_dir, line).await;

        let payload = serde_json::to_string(&result).context("serializing result")?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", payload)?;
        stdout.flush()?;
    }

    info!("Input closed; shutting down");
    if let Err(e) = extension.shutdown().await {
        warn!("Extension shutdown failed: {}", e);
    }
    Ok(())
}

/// Dispatch one request line. Always yields a result object.
async fn dispatch(registry: &ToolRegistry, work_dir: &Path, line: &str) -> ToolResult {
    let request: ToolRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => return ToolResult::error(format!("Invalid request: {}", e)),
    };
    debug!("Dispatching {}", request.op);

    let tool = match registry.get(&request.op) {
        Some(tool) => tool,
        None => return ToolResult::error(ToolError::NotFound(request.op).to_string()),
    };

    let args = if request.args.is_null() {
        json!({})
    } else {
        request.args
    };
    if let Err(e) = tool.validate(&args) {
        return ToolResult::error(e.to_string());
    }

    let ctx = ToolContext::new(work_dir.to_path_buf());
    // A panicking tool must not take the dispatcher down with it.
    match tokio::spawn(async move { tool.execute(args, ctx).await }).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => ToolResult::error(e.to_string()),
        Err(e) => {
            warn!("Tool task failed: {}", e);
            ToolResult::error("Tool execution failed unexpectedly".to_string())
        }
    }
}

/// Print every registered tool definition as JSON.
pub async fn print_tool_definitions(config: OrderConfig) -> anyhow::Result<()> {
    let (registry, _extension, _work_dir) = initialize_extension(config).await?;
    let definitions: Vec<serde_json::Value> = registry
        .list()
        .iter()
        .map(|tool| tool.definition().describe())
        .collect();
    println!("{}", serde_json::to_string_pretty(&definitions)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use brewhands_protocols::tool::ToolDefinition;

    struct EchoTool {
        definition: ToolDefinition,
    }

    impl EchoTool {
        fn new() -> Self {
            Self {
                definition: ToolDefinition::new("echo", "Echo", "Echo the params back")
                    .with_parameters_schema(serde_json::json!({"type": "object"})),
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            params: serde_json::Value,
            _ctx: ToolContext,
        ) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::success_json("echo", params))
        }
    }

    struct PanickyTool {
        definition: ToolDefinition,
    }

    #[async_trait]
    impl Tool for PanickyTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            _params: serde_json::Value,
            _ctx: ToolContext,
        ) -> Result<ToolResult, ToolError> {
            panic!("boom");
        }
    }

    fn registry_with_echo() -> ToolRegistry {
        let registry = ToolRegistry::default();
        registry.register_tool(Arc::new(EchoTool::new())).unwrap();
        registry
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let registry = registry_with_echo();
        let err = registry.register_tool(Arc::new(EchoTool::new())).unwrap_err();
        assert!(matches!(err, ExtensionError::AlreadyRegistered(_)));
    }

    #[tokio::test]
    async fn test_dispatch_round_trip() {
        let registry = registry_with_echo();
        let result = dispatch(
            &registry,
            Path::new("/tmp"),
            r#"{"op": "echo", "args": {"k": 1}}"#,
        )
        .await;
        assert!(result.success);
        assert_eq!(result.structured_output.unwrap()["k"], 1);
    }

    #[tokio::test]
    async fn test_dispatch_defaults_missing_args() {
        let registry = registry_with_echo();
        let result = dispatch(&registry, Path::new("/tmp"), r#"{"op": "echo"}"#).await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_operation() {
        let registry = registry_with_echo();
        let result = dispatch(&registry, Path::new("/tmp"), r#"{"op": "nope"}"#).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("Unknown operation: nope"));
    }

    #[tokio::test]
    async fn test_dispatch_invalid_json() {
        let registry = registry_with_echo();
        let result = dispatch(&registry, Path::new("/tmp"), "{not json").await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("Invalid request"));
    }

    #[tokio::test]
    async fn test_dispatch_rejects_non_object_args() {
        let registry = registry_with_echo();
        let result = dispatch(
            &registry,
            Path::new("/tmp"),
            r#"{"op": "echo", "args": [1, 2]}"#,
        )
        .await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_dispatch_survives_a_panicking_tool() {
        let registry = ToolRegistry::default();
        registry
            .register_tool(Arc::new(PanickyTool {
                definition: ToolDefinition::new("panic", "Panic", "Always panics"),
            }))
            .unwrap();
        let result = dispatch(&registry, Path::new("/tmp"), r#"{"op": "panic"}"#).await;
        assert!(!result.success);
    }
}
