use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use brewhands_protocols::error::ExtensionError;
use brewhands_protocols::extension::{Extension, ExtensionContext, ToolRegistryAccess};
use brewhands_protocols::tool::Tool;

use crate::config::OrderConfig;
use crate::tools::TOOL_IDS;

use super::OrderToolsExtension;

#[derive(Default)]
struct RecordingRegistry {
    registered: Mutex<Vec<String>>,
}

impl ToolRegistryAccess for RecordingRegistry {
    fn register_tool(&self, tool: Arc<dyn Tool>) -> Result<(), ExtensionError> {
        self.registered.lock().push(tool.definition().id.clone());
        Ok(())
    }

    fn unregister_tool(&self, _tool_id: &str) -> Result<(), ExtensionError> {
        Ok(())
    }
}

#[test]
fn test_manifest_declares_every_tool() {
    let ext = OrderToolsExtension::new();
    let provided: HashSet<&str> = ext
        .manifest()
        .provides
        .tools
        .iter()
        .map(String::as_str)
        .collect();
    let expected: HashSet<&str> = TOOL_IDS.iter().copied().collect();
    assert_eq!(provided, expected);
}

#[test]
fn test_manifest_identity() {
    let ext = OrderToolsExtension::new();
    assert_eq!(ext.manifest().id, "tools-order");
    assert_eq!(ext.manifest().version.to_string(), "0.1.0");
    assert!(!ext.manifest().permissions.is_empty());
}

#[tokio::test]
async fn test_initialize_registers_declared_tools() {
    let dir = TempDir::new().unwrap();
    let mut ext =
        OrderToolsExtension::with_config(OrderConfig::default().state_dir(dir.path()));
    let registry = Arc::new(RecordingRegistry::default());
    let ctx = ExtensionContext::new(
        serde_json::json!({}),
        registry.clone(),
        PathBuf::from(dir.path()),
    );

    ext.initialize(ctx).await.unwrap();

    let registered = registry.registered.lock().clone();
    let expected: Vec<String> = TOOL_IDS.iter().map(|id| id.to_string()).collect();
    assert_eq!(registered, expected);
    assert!(ext.flow().is_some());
}

#[tokio::test]
async fn test_shutdown_before_initialize_is_ok() {
    let ext = OrderToolsExtension::new();
    assert!(ext.shutdown().await.is_ok());
}
