//! CDP wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A CDP command sent over the WebSocket.
#[derive(Debug, Serialize)]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// A CDP response or event received over the WebSocket.
#[derive(Debug, Deserialize)]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub method: Option<String>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorPayload>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Error payload inside a CDP response.
#[derive(Debug, Deserialize)]
pub struct CdpErrorPayload {
    pub code: i64,
    pub message: String,
}

/// Response of the `/json/version` discovery endpoint.
#[derive(Debug, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// One cookie record as persisted in the cookie jar.
///
/// Field names follow the CDP cookie shape so the jar round-trips through
/// `Storage.getCookies` / `Storage.setCookies` without translation. Unknown
/// CDP fields (size, priority, ...) are dropped on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Expiry as UNIX seconds; negative means a session cookie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

impl CookieRecord {
    /// Render as a `Storage.setCookies` parameter, dropping session-cookie
    /// expiry markers Chrome will not accept back.
    pub fn as_set_param(&self) -> Value {
        let mut param = serde_json::json!({
            "name": self.name,
            "value": self.value,
            "domain": self.domain,
            "path": self.path,
            "secure": self.secure,
            "httpOnly": self.http_only,
        });
        if let Some(expires) = self.expires.filter(|e| *e > 0.0) {
            param["expires"] = serde_json::json!(expires);
        }
        if let Some(ref same_site) = self.same_site {
            param["sameSite"] = serde_json::json!(same_site);
        }
        param
    }
}
