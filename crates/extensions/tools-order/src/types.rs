//! Order data model.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Drink size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrinkSize {
    Tall,
    Grande,
    Venti,
}

impl DrinkSize {
    /// The capitalized label as the site renders it.
    pub fn label(&self) -> &'static str {
        match self {
            DrinkSize::Tall => "Tall",
            DrinkSize::Grande => "Grande",
            DrinkSize::Venti => "Venti",
        }
    }
}

impl std::fmt::Display for DrinkSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DrinkSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tall" => Ok(DrinkSize::Tall),
            "grande" => Ok(DrinkSize::Grande),
            "venti" => Ok(DrinkSize::Venti),
            other => Err(format!("Unknown drink size: {}", other)),
        }
    }
}

/// One item in an order. Drinks carry a size; food never does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OrderItem {
    Drink { name: String, size: DrinkSize },
    Food { name: String },
}

impl OrderItem {
    /// The product name as requested.
    pub fn name(&self) -> &str {
        match self {
            OrderItem::Drink { name, .. } => name,
            OrderItem::Food { name } => name,
        }
    }

    /// Whether this item is a drink.
    pub fn is_drink(&self) -> bool {
        matches!(self, OrderItem::Drink { .. })
    }

    /// Human-readable line for order summaries: sized name for drinks, bare
    /// name for food.
    pub fn display_line(&self) -> String {
        match self {
            OrderItem::Drink { name, size } => format!("{} {}", size.label(), name),
            OrderItem::Food { name } => name.clone(),
        }
    }
}

/// A named item bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteOrder {
    pub name: String,
    pub items: Vec<OrderItem>,
}

/// The order currently awaiting confirm/cancel. At most one exists per
/// session.
#[derive(Debug, Clone)]
pub struct PendingOrder {
    pub items: Vec<OrderItem>,
    pub location: String,
    pub created_at: SystemTime,
}

/// Human-readable order summary scraped after cart population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub items: Vec<String>,
    /// Best-effort total; absent when no recognizable pattern rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
}

/// Result of building an order, returned to the caller for review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub summary: OrderSummary,
    pub location: String,
    /// Always true: the order is not finalized until confirmed.
    pub approval_required: bool,
}
