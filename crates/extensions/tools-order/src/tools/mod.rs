//! Ordering tools: the operation surface callers invoke.

mod auth;
mod favorites;
mod ordering;

pub use auth::{CheckAuthTool, CompleteLoginTool, LoginTool};
pub use favorites::{AddFavoriteTool, ListFavoritesTool};
pub use ordering::{CancelOrderTool, ConfirmOrderTool, PlaceCustomOrderTool, PlaceFavoriteTool};

use brewhands_protocols::error::ToolError;

use crate::error::OrderError;

/// Every tool id this extension provides, in registration order.
pub const TOOL_IDS: &[&str] = &[
    "order_login",
    "order_complete_login",
    "order_check_auth",
    "order_list_favorites",
    "order_add_favorite",
    "order_place_favorite",
    "order_place_custom",
    "order_confirm",
    "order_cancel",
];

/// Workflow failures surface as execution failures carrying the cause text.
pub(crate) fn workflow_error(e: OrderError) -> ToolError {
    ToolError::ExecutionFailed(e.to_string())
}

pub(crate) fn invalid_params(e: serde_json::Error) -> ToolError {
    ToolError::InvalidParameters(e.to_string())
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
