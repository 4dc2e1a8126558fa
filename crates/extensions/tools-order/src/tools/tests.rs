use std::path::PathBuf;
use std::sync::Arc;

use brewhands_protocols::error::ToolError;
use brewhands_protocols::tool::{Tool, ToolContext};
use tempfile::TempDir;

use crate::config::OrderConfig;
use crate::favorites::FavoriteStore;
use crate::order::OrderFlow;
use crate::session::SessionManager;

use super::*;

struct Fixture {
    _dir: TempDir,
    flow: Arc<OrderFlow>,
    session: Arc<SessionManager>,
    favorites: Arc<FavoriteStore>,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let config = OrderConfig::default().state_dir(dir.path());
    let session = Arc::new(SessionManager::new(config.clone()));
    let favorites = Arc::new(FavoriteStore::load(config.favorites_path()).unwrap());
    let flow = Arc::new(OrderFlow::new(session.clone()));
    Fixture {
        _dir: dir,
        flow,
        session,
        favorites,
    }
}

fn ctx() -> ToolContext {
    ToolContext::new(PathBuf::from("/tmp"))
}

#[tokio::test]
async fn test_check_auth_reports_no_session() {
    let fx = fixture();
    let tool = CheckAuthTool::new(fx.session.clone());
    let result = tool.execute(serde_json::json!({}), ctx()).await.unwrap();
    assert!(result.success);
    let output = result.structured_output.unwrap();
    assert_eq!(output["authenticated"], serde_json::json!(false));
}

#[tokio::test]
async fn test_list_favorites_includes_seeded_defaults() {
    let fx = fixture();
    let tool = ListFavoritesTool::new(fx.favorites.clone());
    let result = tool.execute(serde_json::json!({}), ctx()).await.unwrap();
    assert!(result.success);
    assert!(result.content.contains("Morning Ritual"));
    let output = result.structured_output.unwrap();
    assert_eq!(output.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_add_favorite_round_trip() {
    let fx = fixture();
    let add = AddFavoriteTool::new(fx.favorites.clone());
    let params = serde_json::json!({
        "name": "Afternoon Pick-Me-Up",
        "items": [{"type": "drink", "name": "Cold Brew", "size": "venti"}]
    });
    let result = add.execute(params, ctx()).await.unwrap();
    assert!(result.success);

    let list = ListFavoritesTool::new(fx.favorites.clone());
    let result = list.execute(serde_json::json!({}), ctx()).await.unwrap();
    assert!(result.content.contains("Afternoon Pick-Me-Up: Venti Cold Brew"));
}

#[tokio::test]
async fn test_add_favorite_rejects_empty_items() {
    let fx = fixture();
    let tool = AddFavoriteTool::new(fx.favorites.clone());
    let params = serde_json::json!({"name": "Nothing", "items": []});
    let err = tool.execute(params, ctx()).await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidParameters(_)));
}

#[tokio::test]
async fn test_add_favorite_rejects_drink_without_size() {
    let fx = fixture();
    let tool = AddFavoriteTool::new(fx.favorites.clone());
    let params = serde_json::json!({
        "name": "Half Spec",
        "items": [{"type": "drink", "name": "Cold Brew"}]
    });
    let err = tool.execute(params, ctx()).await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidParameters(_)));
}

#[tokio::test]
async fn test_place_favorite_unknown_name() {
    let fx = fixture();
    let tool = PlaceFavoriteTool::new(fx.flow.clone(), fx.favorites.clone());
    let err = tool
        .execute(serde_json::json!({"name": "No Such Favorite"}), ctx())
        .await
        .unwrap_err();
    match err {
        ToolError::InvalidParameters(message) => assert!(message.contains("No Such Favorite")),
        other => panic!("expected InvalidParameters, got {:?}", other),
    }
}

#[tokio::test]
async fn test_confirm_without_pending_order() {
    let fx = fixture();
    let tool = ConfirmOrderTool::new(fx.flow.clone());
    let err = tool.execute(serde_json::json!({}), ctx()).await.unwrap_err();
    match err {
        ToolError::ExecutionFailed(message) => assert!(message.contains("No order is pending")),
        other => panic!("expected ExecutionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancel_without_pending_order() {
    let fx = fixture();
    let tool = CancelOrderTool::new(fx.flow.clone());
    let err = tool.execute(serde_json::json!({}), ctx()).await.unwrap_err();
    assert!(matches!(err, ToolError::ExecutionFailed(_)));
}

#[tokio::test]
async fn test_custom_order_with_no_items() {
    let fx = fixture();
    let tool = PlaceCustomOrderTool::new(fx.flow.clone());
    let err = tool.execute(serde_json::json!({}), ctx()).await.unwrap_err();
    match err {
        ToolError::ExecutionFailed(message) => assert!(message.contains("no items")),
        other => panic!("expected ExecutionFailed, got {:?}", other),
    }
}

#[test]
fn test_tool_ids_match_definitions() {
    let fx = fixture();
    let definitions = vec![
        LoginTool::new(fx.session.clone()).definition().id.clone(),
        CompleteLoginTool::new(fx.session.clone()).definition().id.clone(),
        CheckAuthTool::new(fx.session.clone()).definition().id.clone(),
        ListFavoritesTool::new(fx.favorites.clone()).definition().id.clone(),
        AddFavoriteTool::new(fx.favorites.clone()).definition().id.clone(),
        PlaceFavoriteTool::new(fx.flow.clone(), fx.favorites.clone())
            .definition()
            .id
            .clone(),
        PlaceCustomOrderTool::new(fx.flow.clone()).definition().id.clone(),
        ConfirmOrderTool::new(fx.flow.clone()).definition().id.clone(),
        CancelOrderTool::new(fx.flow.clone()).definition().id.clone(),
    ];
    let expected: Vec<String> = TOOL_IDS.iter().map(|id| id.to_string()).collect();
    assert_eq!(definitions, expected);
}
