//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use super::error::CdpError;
use super::page::PageTab;
use super::protocol::{BrowserVersion, CdpRequest, CdpResponse, CookieRecord};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Pending request waiting for a response.
struct PendingRequest {
    tx: oneshot::Sender<Result<Value, CdpError>>,
}

/// CDP client for one Chrome instance.
///
/// The ordering workflow drives exactly one page, so the client keeps a
/// single WebSocket and routes responses by request id; protocol events are
/// not consumed — every wait in this crate is a bounded poll instead.
pub struct CdpClient {
    ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    request_id: AtomicU64,
    pending: Arc<Mutex<HashMap<u64, PendingRequest>>>,
    _recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at the given debugging endpoint.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();

        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let version: BrowserVersion = reqwest::get(&version_url)
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?;

        debug!("Connected to browser: {}", version.browser);

        // The advertised debugger URL comes from the browser; validate it
        // before handing it to the WebSocket layer.
        let ws_url = url::Url::parse(&version.web_socket_debugger_url)?;

        let (ws_stream, _) = tokio_tungstenite::connect_async(ws_url.as_str())
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let pending: Arc<Mutex<HashMap<u64, PendingRequest>>> =
            Arc::new(Mutex::new(HashMap::new()));

        let recv_task = {
            let pending = pending.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, pending).await;
            })
        };

        Ok(Self {
            ws_tx: Arc::new(tokio::sync::Mutex::new(ws_sink)),
            request_id: AtomicU64::new(1),
            pending,
            _recv_task: recv_task,
        })
    }

    /// WebSocket receive loop: route responses to their pending requests.
    async fn receive_loop(mut ws_source: WsSource, pending: Arc<Mutex<HashMap<u64, PendingRequest>>>) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(resp) => {
                            if let Some(id) = resp.id {
                                let pending_req = pending.lock().remove(&id);
                                if let Some(req) = pending_req {
                                    let result = if let Some(error) = resp.error {
                                        Err(CdpError::Protocol {
                                            code: error.code,
                                            message: error.message,
                                        })
                                    } else {
                                        Ok(resp.result.unwrap_or(Value::Null))
                                    };
                                    let _ = req.tx.send(result);
                                }
                            }
                            // Events are dropped: waits are polls, not
                            // event subscriptions.
                        }
                        Err(e) => {
                            warn!("Failed to parse CDP message: {}", e);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("CDP WebSocket closed");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("CDP WebSocket error: {}", e);
                    break;
                }
            }
        }

        // Fail anything still waiting so callers see SessionClosed, not a hang.
        let mut pending = pending.lock();
        for (_, req) in pending.drain() {
            let _ = req.tx.send(Err(CdpError::SessionClosed));
        }
    }

    /// Send a CDP command, optionally scoped to an attached session.
    pub(crate) async fn raw_call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });

        {
            let mut ws = self.ws_tx.lock().await;
            ws.send(Message::Text(json.into())).await?;
        }

        match tokio::time::timeout(COMMAND_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.raw_call(method, params, None).await
    }

    /// Create a new page and attach to it.
    pub async fn new_page(self: &Arc<Self>) -> Result<PageTab, CdpError> {
        let created = self
            .call(
                "Target.createTarget",
                Some(json!({"url": "about:blank"})),
            )
            .await?;
        let target_id = created["targetId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing targetId".to_string()))?
            .to_string();

        let attached = self
            .call(
                "Target.attachToTarget",
                Some(json!({"targetId": target_id, "flatten": true})),
            )
            .await?;
        let session_id = attached["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let tab = PageTab::new(self.clone(), target_id, session_id);
        tab.enable_domains().await?;
        Ok(tab)
    }

    /// Close a page by target id.
    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.closeTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }

    /// Read every cookie the browser holds.
    pub async fn get_all_cookies(&self) -> Result<Vec<CookieRecord>, CdpError> {
        let result = self.call("Storage.getCookies", None).await?;
        let cookies: Vec<CookieRecord> =
            serde_json::from_value(result["cookies"].clone()).unwrap_or_default();
        Ok(cookies)
    }

    /// Install cookies into the browser.
    pub async fn set_cookies(&self, cookies: &[CookieRecord]) -> Result<(), CdpError> {
        if cookies.is_empty() {
            return Ok(());
        }
        let params: Vec<Value> = cookies.iter().map(CookieRecord::as_set_param).collect();
        self.call("Storage.setCookies", Some(json!({"cookies": params})))
            .await?;
        Ok(())
    }

    /// Deny the geolocation permission for all origins. Best-effort: some
    /// Chrome builds reject the browser-wide form, and the workflow does not
    /// depend on it.
    pub async fn deny_geolocation(&self) {
        let result = self
            .call(
                "Browser.setPermission",
                Some(json!({
                    "permission": {"name": "geolocation"},
                    "setting": "denied",
                })),
            )
            .await;
        if let Err(e) = result {
            warn!("Could not deny geolocation permission: {}", e);
        }
    }
}
