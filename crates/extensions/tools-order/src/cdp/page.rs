//! A single attached page session.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::debug;

use super::client::CdpClient;
use super::error::CdpError;

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);
const LOAD_POLL: Duration = Duration::from_millis(100);
const SELECTOR_POLL: Duration = Duration::from_millis(250);

/// The one page the ordering workflow drives.
pub struct PageTab {
    client: Arc<CdpClient>,
    target_id: String,
    session_id: String,
}

/// Quote a string as a JavaScript literal.
fn js_quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

impl PageTab {
    pub(crate) fn new(client: Arc<CdpClient>, target_id: String, session_id: String) -> Self {
        Self {
            client,
            target_id,
            session_id,
        }
    }

    /// Get target ID.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Send a CDP command scoped to this page.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.client
            .raw_call(method, params, Some(&self.session_id))
            .await
    }

    /// Enable the CDP domains the workflow uses.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Navigate to a URL and wait for the document to render.
    pub async fn navigate(&self, url: &str) -> Result<(), CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText").and_then(|e| e.as_str()) {
            if !error.is_empty() {
                return Err(CdpError::NavigationFailed(error.to_string()));
            }
        }

        self.wait_for_load().await?;
        debug!("Navigated to {}", url);
        Ok(())
    }

    /// Wait for the document ready state.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let start = Instant::now();
        loop {
            let result = self.evaluate("document.readyState").await?;
            if let Some(state) = result.as_str() {
                if state == "complete" || state == "interactive" {
                    return Ok(());
                }
            }
            if start.elapsed() > LOAD_TIMEOUT {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }
            tokio::time::sleep(LOAD_POLL).await;
        }
    }

    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["text"].as_str().unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Current page URL.
    pub async fn current_url(&self) -> Result<String, CdpError> {
        let value = self.evaluate("window.location.href").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Rendered text of the whole page.
    pub async fn visible_text(&self) -> Result<String, CdpError> {
        let value = self
            .evaluate("document.body ? document.body.innerText : ''")
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Wait until a selector matches, or time out.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), CdpError> {
        let expression = format!("document.querySelector({}) !== null", js_quote(selector));
        let start = Instant::now();
        loop {
            if self.evaluate(&expression).await?.as_bool() == Some(true) {
                return Ok(());
            }
            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!("selector {}", selector)));
            }
            tokio::time::sleep(SELECTOR_POLL).await;
        }
    }

    /// Rendered text of every element matching a selector, in DOM order.
    pub async fn element_texts(&self, selector: &str) -> Result<Vec<String>, CdpError> {
        let expression = format!(
            "JSON.stringify(Array.from(document.querySelectorAll({})).map(el => (el.innerText || el.textContent || '').trim()))",
            js_quote(selector)
        );
        let value = self.evaluate(&expression).await?;
        let raw = value.as_str().unwrap_or("[]");
        Ok(serde_json::from_str(raw).unwrap_or_default())
    }

    /// Click the first element matching a selector. Returns whether an
    /// element was there to click.
    pub async fn click_selector(&self, selector: &str) -> Result<bool, CdpError> {
        let expression = format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; el.click(); return true; }})()",
            js_quote(selector)
        );
        Ok(self.evaluate(&expression).await?.as_bool() == Some(true))
    }

    /// Click the n-th element matching a selector.
    pub async fn click_nth(&self, selector: &str, index: usize) -> Result<bool, CdpError> {
        let expression = format!(
            "(() => {{ const els = document.querySelectorAll({}); const el = els[{}]; if (!el) return false; el.click(); return true; }})()",
            js_quote(selector),
            index
        );
        Ok(self.evaluate(&expression).await?.as_bool() == Some(true))
    }

    /// Click the first visible element whose text contains the needle
    /// (case-insensitive). Returns whether a match was clicked.
    pub async fn click_by_text(&self, selector: &str, needle: &str) -> Result<bool, CdpError> {
        let expression = format!(
            r#"(() => {{
                const needle = {}.toLowerCase();
                for (const el of document.querySelectorAll({})) {{
                    const text = (el.innerText || el.textContent || '').toLowerCase();
                    if (el.offsetParent !== null && text.includes(needle)) {{
                        el.click();
                        return true;
                    }}
                }}
                return false;
            }})()"#,
            js_quote(needle),
            js_quote(selector)
        );
        Ok(self.evaluate(&expression).await?.as_bool() == Some(true))
    }

    /// Click every element matching a selector. Returns how many were
    /// clicked.
    pub async fn click_all(&self, selector: &str) -> Result<u64, CdpError> {
        let expression = format!(
            "(() => {{ const els = Array.from(document.querySelectorAll({})); els.forEach(el => el.click()); return els.length; }})()",
            js_quote(selector)
        );
        Ok(self.evaluate(&expression).await?.as_u64().unwrap_or(0))
    }

    /// Fill an input, dispatching the events a framework-rendered page needs
    /// to notice the change. Returns whether the input was found.
    pub async fn fill(&self, selector: &str, value: &str) -> Result<bool, CdpError> {
        let expression = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) return false;
                const setter = Object.getOwnPropertyDescriptor(window.HTMLInputElement.prototype, 'value').set;
                setter.call(el, {});
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            js_quote(selector),
            js_quote(value)
        );
        Ok(self.evaluate(&expression).await?.as_bool() == Some(true))
    }

    /// Press Enter in the element matching a selector.
    pub async fn press_enter(&self, selector: &str) -> Result<(), CdpError> {
        let focus = format!(
            "(() => {{ const el = document.querySelector({}); if (el) el.focus(); }})()",
            js_quote(selector)
        );
        self.evaluate(&focus).await?;

        for event_type in ["keyDown", "keyUp"] {
            self.call(
                "Input.dispatchKeyEvent",
                Some(json!({
                    "type": event_type,
                    "key": "Enter",
                    "code": "Enter",
                    "windowsVirtualKeyCode": 13,
                    "nativeVirtualKeyCode": 13,
                })),
            )
            .await?;
        }
        Ok(())
    }
}
