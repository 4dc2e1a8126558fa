//! Extension context for initialization.

use std::sync::Arc;

use super::ToolRegistryAccess;

/// Context passed to extensions during initialization.
#[derive(Clone)]
pub struct ExtensionContext {
    /// Configuration for this extension.
    pub config: serde_json::Value,

    /// Registry for registering tools.
    pub tool_registry: Arc<dyn ToolRegistryAccess>,

    /// Working directory.
    pub work_dir: std::path::PathBuf,
}

impl ExtensionContext {
    /// Create a new extension context.
    pub fn new(
        config: serde_json::Value,
        tool_registry: Arc<dyn ToolRegistryAccess>,
        work_dir: std::path::PathBuf,
    ) -> Self {
        Self {
            config,
            tool_registry,
            work_dir,
        }
    }

    /// Get a configuration value.
    pub fn get_config<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.config
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
