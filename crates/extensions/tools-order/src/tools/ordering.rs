//! Ordering tools: build, confirm, and cancel orders.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use brewhands_protocols::error::ToolError;
use brewhands_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use brewhands_protocols::types::RiskLevel;

use crate::favorites::FavoriteStore;
use crate::order::OrderFlow;
use crate::store::DEFAULT_LOCATION_NAME;
use crate::types::{DrinkSize, OrderItem, PlacedOrder};

use super::{invalid_params, workflow_error};

fn location_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": "Pickup location name; unknown names fall back to the default store"
    })
}

fn review_text(order: &PlacedOrder) -> String {
    let mut text = format!(
        "Order pending review for pickup at \"{}\": {}",
        order.location,
        order.summary.items.join(", ")
    );
    if let Some(ref total) = order.summary.total {
        text.push_str(&format!(" — {}", total));
    }
    text.push_str(". Confirm with order_confirm or discard with order_cancel.");
    text
}

// ============================================================================
// Place Favorite Tool
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PlaceFavoriteParams {
    pub name: String,
    pub location: Option<String>,
}

/// Build a pending order from a saved favorite.
pub struct PlaceFavoriteTool {
    definition: ToolDefinition,
    flow: Arc<OrderFlow>,
    favorites: Arc<FavoriteStore>,
}

impl PlaceFavoriteTool {
    pub fn new(flow: Arc<OrderFlow>, favorites: Arc<FavoriteStore>) -> Self {
        let definition = ToolDefinition::new(
            "order_place_favorite",
            "Order Favorite",
            "Add a saved favorite to the cart and return its summary for review. Nothing is \
             purchased until order_confirm.",
        )
        .with_risk_level(RiskLevel::Medium)
        .with_parameters_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "Name of the saved favorite"},
                "location": location_schema()
            },
            "required": ["name"]
        }));
        Self {
            definition,
            flow,
            favorites,
        }
    }
}

#[async_trait]
impl Tool for PlaceFavoriteTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: PlaceFavoriteParams = serde_json::from_value(params).map_err(invalid_params)?;

        let favorite = self.favorites.get(&params.name).ok_or_else(|| {
            ToolError::InvalidParameters(format!("no favorite named \"{}\"", params.name))
        })?;
        let location = params
            .location
            .unwrap_or_else(|| DEFAULT_LOCATION_NAME.to_string());

        let order = self
            .flow
            .place_order(favorite.items, location)
            .await
            .map_err(workflow_error)?;

        Ok(ToolResult::success_json(
            review_text(&order),
            serde_json::to_value(&order).map_err(|e| ToolError::ExecutionFailed(e.to_string()))?,
        ))
    }
}

// ============================================================================
// Place Custom Order Tool
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DrinkSpec {
    pub name: String,
    pub size: DrinkSize,
}

#[derive(Debug, Deserialize)]
pub struct PlaceCustomParams {
    #[serde(default)]
    pub drinks: Vec<DrinkSpec>,
    #[serde(default)]
    pub food: Vec<String>,
    pub location: Option<String>,
}

/// Build a pending order from explicit drink and food lists.
pub struct PlaceCustomOrderTool {
    definition: ToolDefinition,
    flow: Arc<OrderFlow>,
}

impl PlaceCustomOrderTool {
    pub fn new(flow: Arc<OrderFlow>) -> Self {
        let definition = ToolDefinition::new(
            "order_place_custom",
            "Custom Order",
            "Add the given drinks and food to the cart and return a summary for review. \
             Nothing is purchased until order_confirm.",
        )
        .with_risk_level(RiskLevel::Medium)
        .with_parameters_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "drinks": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "size": {"type": "string", "enum": ["tall", "grande", "venti"]}
                        },
                        "required": ["name", "size"]
                    }
                },
                "food": {
                    "type": "array",
                    "items": {"type": "string"}
                },
                "location": location_schema()
            },
            "required": []
        }));
        Self { definition, flow }
    }
}

#[async_trait]
impl Tool for PlaceCustomOrderTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: PlaceCustomParams = serde_json::from_value(params).map_err(invalid_params)?;

        // Addition order is preserved: drinks first, then food, as given.
        let mut items: Vec<OrderItem> = params
            .drinks
            .into_iter()
            .map(|drink| OrderItem::Drink {
                name: drink.name,
                size: drink.size,
            })
            .collect();
        items.extend(params.food.into_iter().map(|name| OrderItem::Food { name }));

        let location = params
            .location
            .unwrap_or_else(|| DEFAULT_LOCATION_NAME.to_string());

        let order = self
            .flow
            .place_order(items, location)
            .await
            .map_err(workflow_error)?;

        Ok(ToolResult::success_json(
            review_text(&order),
            serde_json::to_value(&order).map_err(|e| ToolError::ExecutionFailed(e.to_string()))?,
        ))
    }
}

// ============================================================================
// Confirm Order Tool
// ============================================================================

/// Finalize the pending order. Irreversible.
pub struct ConfirmOrderTool {
    definition: ToolDefinition,
    flow: Arc<OrderFlow>,
}

impl ConfirmOrderTool {
    pub fn new(flow: Arc<OrderFlow>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "order_confirm",
                "Confirm Order",
                "Place the order pending review. This completes the purchase.",
            )
            .with_risk_level(RiskLevel::High),
            flow,
        }
    }
}

#[async_trait]
impl Tool for ConfirmOrderTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let (summary, location) = self.flow.confirm_order().await.map_err(workflow_error)?;

        Ok(ToolResult::success_json(
            format!(
                "Order placed for pickup at \"{}\": {}",
                location,
                summary.items.join(", ")
            ),
            serde_json::json!({
                "items": summary.items,
                "location": location,
            }),
        ))
    }
}

// ============================================================================
// Cancel Order Tool
// ============================================================================

/// Discard the pending order without purchasing.
pub struct CancelOrderTool {
    definition: ToolDefinition,
    flow: Arc<OrderFlow>,
}

impl CancelOrderTool {
    pub fn new(flow: Arc<OrderFlow>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "order_cancel",
                "Cancel Order",
                "Discard the order pending review without purchasing.",
            ),
            flow,
        }
    }
}

#[async_trait]
impl Tool for CancelOrderTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let message = self.flow.cancel_order().await.map_err(workflow_error)?;
        Ok(ToolResult::success(message))
    }
}
