//! Favorites tools: list and save named item bundles.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use brewhands_protocols::error::ToolError;
use brewhands_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};

use crate::favorites::FavoriteStore;
use crate::types::OrderItem;

use super::{invalid_params, workflow_error};

// ============================================================================
// List Favorites Tool
// ============================================================================

/// List every saved favorite.
pub struct ListFavoritesTool {
    definition: ToolDefinition,
    favorites: Arc<FavoriteStore>,
}

impl ListFavoritesTool {
    pub fn new(favorites: Arc<FavoriteStore>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "order_list_favorites",
                "List Favorites",
                "List the saved favorite orders by name, with their items.",
            ),
            favorites,
        }
    }
}

#[async_trait]
impl Tool for ListFavoritesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let favorites = self.favorites.list();
        let lines: Vec<String> = favorites
            .iter()
            .map(|favorite| {
                let items: Vec<String> =
                    favorite.items.iter().map(OrderItem::display_line).collect();
                format!("{}: {}", favorite.name, items.join(", "))
            })
            .collect();

        Ok(ToolResult::success_json(
            lines.join("\n"),
            serde_json::to_value(&favorites).map_err(|e| ToolError::ExecutionFailed(e.to_string()))?,
        ))
    }
}

// ============================================================================
// Add Favorite Tool
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddFavoriteParams {
    pub name: String,
    pub items: Vec<OrderItem>,
}

/// Save a named favorite, replacing an existing one of the same name.
pub struct AddFavoriteTool {
    definition: ToolDefinition,
    favorites: Arc<FavoriteStore>,
}

impl AddFavoriteTool {
    pub fn new(favorites: Arc<FavoriteStore>) -> Self {
        let definition = ToolDefinition::new(
            "order_add_favorite",
            "Add Favorite",
            "Save a named favorite order. Items are drinks (with a size: tall, grande, or \
             venti) or food.",
        )
        .with_parameters_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Name for the favorite; replaces an existing favorite of the same name"
                },
                "items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "type": {"type": "string", "enum": ["drink", "food"]},
                            "name": {"type": "string"},
                            "size": {
                                "type": "string",
                                "enum": ["tall", "grande", "venti"],
                                "description": "Required for drinks, ignored for food"
                            }
                        },
                        "required": ["type", "name"]
                    }
                }
            },
            "required": ["name", "items"]
        }));
        Self { definition, favorites }
    }
}

#[async_trait]
impl Tool for AddFavoriteTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: AddFavoriteParams = serde_json::from_value(params).map_err(invalid_params)?;
        if params.items.is_empty() {
            return Err(ToolError::InvalidParameters(
                "a favorite needs at least one item".to_string(),
            ));
        }

        let favorite = self
            .favorites
            .add(params.name, params.items)
            .map_err(workflow_error)?;
        debug!("Added favorite \"{}\"", favorite.name);

        Ok(ToolResult::success_json(
            format!("Saved favorite \"{}\"", favorite.name),
            serde_json::to_value(&favorite).map_err(|e| ToolError::ExecutionFailed(e.to_string()))?,
        ))
    }
}
