//! Extension trait definition.

use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

use super::{ExtensionContext, ExtensionManifest};
use crate::error::ExtensionError;

/// Core trait for extensions.
///
/// An extension owns its subsystem state and registers the tools it provides
/// during `initialize`.
#[async_trait]
pub trait Extension: Send + Sync + 'static {
    /// Returns the extension manifest.
    fn manifest(&self) -> &ExtensionManifest;

    /// Initialize the extension with the given context.
    async fn initialize(&mut self, ctx: ExtensionContext) -> Result<(), ExtensionError>;

    /// Shutdown the extension.
    async fn shutdown(&self) -> Result<(), ExtensionError> {
        Ok(())
    }

    /// Returns a reference to the extension as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to the extension as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Trait for accessing the tool registry from extensions.
pub trait ToolRegistryAccess: Send + Sync {
    /// Register a tool.
    fn register_tool(&self, tool: Arc<dyn crate::tool::Tool>) -> Result<(), ExtensionError>;

    /// Unregister a tool.
    fn unregister_tool(&self, tool_id: &str) -> Result<(), ExtensionError>;
}
