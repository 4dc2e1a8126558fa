//! Integration tests for the browser session.
//!
//! These cases drive a real Chrome and are ignored by default. Run them
//! explicitly on a machine with Chrome installed:
//! `cargo test -p brewhands-tools-order --test integration_test -- --ignored`

use brewhands_tools_order::{OrderConfig, SessionManager};

fn test_config(dir: &tempfile::TempDir) -> OrderConfig {
    OrderConfig::default()
        .debug_port(9333) // avoid colliding with a developer's Chrome
        .state_dir(dir.path())
        .profile_dir(dir.path().join("profile"))
}

#[test]
#[ignore = "requires Chrome"]
fn test_chrome_detection() {
    let chrome = SessionManager::find_chrome();
    assert!(chrome.is_some(), "Chrome should be installed on the system");
    assert!(chrome.unwrap().exists());
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_launch_reuse_and_teardown() {
    let dir = tempfile::TempDir::new().unwrap();
    let manager = SessionManager::new(test_config(&dir));

    let page = manager.ensure_page(false).await.unwrap();
    page.navigate("https://example.com").await.unwrap();
    assert!(page.current_url().await.unwrap().contains("example.com"));

    // A second ensure reuses the same live session.
    let again = manager.ensure_page(false).await.unwrap();
    assert_eq!(again.target_id(), page.target_id());

    manager.teardown().await;
    assert!(manager.current_page().await.is_none());
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_page_text_and_selectors() {
    let dir = tempfile::TempDir::new().unwrap();
    let manager = SessionManager::new(test_config(&dir));

    let page = manager.ensure_page(false).await.unwrap();
    page.navigate("https://example.com").await.unwrap();

    let text = page.visible_text().await.unwrap();
    assert!(text.contains("Example Domain"));

    let headings = page.element_texts("h1").await.unwrap();
    assert_eq!(headings.len(), 1);

    manager.teardown().await;
}
