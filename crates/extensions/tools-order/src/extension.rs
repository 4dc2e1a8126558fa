//! Ordering tools extension.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use brewhands_protocols::error::ExtensionError;
use brewhands_protocols::extension::{Extension, ExtensionContext, ExtensionManifest};
use brewhands_protocols::types::{Permission, Version};

use crate::config::{OrderConfig, EMAIL_ENV, PASSWORD_ENV};
use crate::favorites::FavoriteStore;
use crate::order::OrderFlow;
use crate::session::SessionManager;
use crate::tools::*;

/// Ordering tools extension.
///
/// Owns the browser session, the order state machine, and the favorites
/// store. Chrome is launched lazily on the first tool that needs it; the
/// login and ordering tools share one session and one pending-order slot.
pub struct OrderToolsExtension {
    manifest: ExtensionManifest,
    config: OrderConfig,
    flow: Option<Arc<OrderFlow>>,
}

impl OrderToolsExtension {
    pub fn new() -> Self {
        Self::with_config(OrderConfig::default())
    }

    pub fn with_config(config: OrderConfig) -> Self {
        let mut manifest = ExtensionManifest::new(
            "tools-order",
            "Order Tools",
            Version::new(0, 1, 0),
        )
        .with_description(
            "Coffee ordering via CDP - drives the Starbucks web site with an explicit \
             confirm step before purchase",
        );
        manifest.provides.tools = TOOL_IDS.iter().map(|id| id.to_string()).collect();
        manifest.permissions = vec![
            Permission::Network {
                hosts: vec!["www.starbucks.com".to_string()],
            },
            Permission::FileSystem {
                paths: vec![config.state_dir.display().to_string()],
            },
            Permission::Environment {
                variables: vec![EMAIL_ENV.to_string(), PASSWORD_ENV.to_string()],
            },
        ];

        Self {
            manifest,
            config,
            flow: None,
        }
    }

    /// The order flow, once initialized.
    pub fn flow(&self) -> Option<Arc<OrderFlow>> {
        self.flow.clone()
    }
}

impl Default for OrderToolsExtension {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extension for OrderToolsExtension {
    fn manifest(&self) -> &ExtensionManifest {
        &self.manifest
    }

    async fn initialize(&mut self, ctx: ExtensionContext) -> Result<(), ExtensionError> {
        let session = Arc::new(SessionManager::new(self.config.clone()));
        let favorites = Arc::new(
            FavoriteStore::load(self.config.favorites_path())
                .map_err(|e| ExtensionError::InitializationFailed(e.to_string()))?,
        );
        let flow = Arc::new(OrderFlow::new(session.clone()));

        ctx.tool_registry
            .register_tool(Arc::new(LoginTool::new(session.clone())))?;
        ctx.tool_registry
            .register_tool(Arc::new(CompleteLoginTool::new(session.clone())))?;
        ctx.tool_registry
            .register_tool(Arc::new(CheckAuthTool::new(session.clone())))?;
        ctx.tool_registry
            .register_tool(Arc::new(ListFavoritesTool::new(favorites.clone())))?;
        ctx.tool_registry
            .register_tool(Arc::new(AddFavoriteTool::new(favorites.clone())))?;
        ctx.tool_registry
            .register_tool(Arc::new(PlaceFavoriteTool::new(flow.clone(), favorites.clone())))?;
        ctx.tool_registry
            .register_tool(Arc::new(PlaceCustomOrderTool::new(flow.clone())))?;
        ctx.tool_registry
            .register_tool(Arc::new(ConfirmOrderTool::new(flow.clone())))?;
        ctx.tool_registry
            .register_tool(Arc::new(CancelOrderTool::new(flow.clone())))?;

        self.flow = Some(flow);

        tracing::info!(
            "Order tools extension initialized (state dir: {})",
            self.config.state_dir.display()
        );
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ExtensionError> {
        if let Some(ref flow) = self.flow {
            flow.session().teardown().await;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "extension_tests.rs"]
mod tests;
