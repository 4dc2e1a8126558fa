//! Browser session management.
//!
//! One Chrome instance, one page, per process. The session is created
//! lazily, torn down and recreated for a fresh interactive login, and its
//! cookie jar is persisted only on a confirmed authentication.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::{Child, Command};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cdp::{CdpClient, CdpError, CookieRecord, PageTab};
use crate::config::OrderConfig;
use crate::error::OrderError;
use crate::menu;

/// Authenticated-area URL shape: account pages, the menu, or the site root.
static AUTHED_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"starbucks\.com/(account|menu)([/?#]|$)|starbucks\.com/?$").unwrap()
});

const ENDPOINT_ATTEMPTS: u32 = 30;
const ENDPOINT_POLL: Duration = Duration::from_millis(500);
const LOGIN_POLL: Duration = Duration::from_secs(1);
const AUTO_LOGIN_FORM_WAIT: Duration = Duration::from_secs(15);
const AUTO_LOGIN_WAIT: Duration = Duration::from_secs(45);

/// Whether a URL sits inside the authenticated area. The sign-in page lives
/// under `/account/`, so it is excluded explicitly.
pub(crate) fn is_authenticated_url(url: &str) -> bool {
    !url.contains("signin") && AUTHED_URL_RE.is_match(url)
}

/// Owns the Chrome process, CDP client, and the workflow's single page.
pub struct SessionManager {
    config: OrderConfig,
    chrome: RwLock<Option<Child>>,
    client: RwLock<Option<Arc<CdpClient>>>,
    page: RwLock<Option<Arc<PageTab>>>,
}

impl SessionManager {
    /// Create a new session manager. No browser is launched until first use.
    pub fn new(config: OrderConfig) -> Self {
        Self {
            config,
            chrome: RwLock::new(None),
            client: RwLock::new(None),
            page: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &OrderConfig {
        &self.config
    }

    /// Whether unattended-login credentials are configured.
    pub fn credentials_configured(&self) -> bool {
        self.config.credentials().is_some()
    }

    /// Find a Chrome executable on this system.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let candidates = [
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];

        #[cfg(target_os = "linux")]
        let candidates = [
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let candidates = [
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        candidates
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// The live page, if a session exists.
    pub async fn current_page(&self) -> Option<Arc<PageTab>> {
        self.page.read().await.clone()
    }

    /// Ensure a browser and page exist, returning the page.
    ///
    /// Launches Chrome on first use — visible when `interactive`, headless
    /// otherwise — denies geolocation, and restores the persisted cookie
    /// jar. A missing jar is "no session yet", not an error. An existing
    /// session is reused as-is regardless of the requested mode; callers
    /// that need a fresh visible window tear down first.
    pub async fn ensure_page(&self, interactive: bool) -> Result<Arc<PageTab>, OrderError> {
        let existing = self.page.read().await.clone();
        if let Some(page) = existing {
            if page.evaluate("1").await.is_ok() {
                return Ok(page);
            }
            // The browser went away underneath us (closed window, dead
            // process); recreate both handles.
            debug!("Existing browser session is dead; recreating");
            self.teardown().await;
        }

        let chrome_path = match self.config.chrome_path.clone() {
            Some(path) => path,
            None => Self::find_chrome().ok_or_else(|| {
                CdpError::ChromeNotAvailable("no Chrome executable found".to_string())
            })?,
        };

        let child = self.launch_chrome(&chrome_path, interactive)?;
        *self.chrome.write().await = Some(child);

        self.wait_for_endpoint().await?;

        let client = Arc::new(CdpClient::connect(&self.config.endpoint()).await?);
        client.deny_geolocation().await;

        let jar = self.load_cookie_jar();
        if jar.is_empty() {
            debug!("No persisted cookies to restore");
        } else if let Err(e) = client.set_cookies(&jar).await {
            warn!("Could not restore {} persisted cookies: {}", jar.len(), e);
        } else {
            debug!("Restored {} persisted cookies", jar.len());
        }

        let page = Arc::new(client.new_page().await?);

        *self.client.write().await = Some(client);
        *self.page.write().await = Some(page.clone());

        info!(
            "Browser session ready ({})",
            if interactive { "visible" } else { "headless" }
        );
        Ok(page)
    }

    fn launch_chrome(&self, chrome_path: &std::path::Path, interactive: bool) -> Result<Child, OrderError> {
        let profile_dir = self.config.resolved_profile_dir();
        if let Err(e) = std::fs::create_dir_all(&profile_dir) {
            warn!("Failed to create profile directory: {}", e);
        }

        info!(
            "Launching Chrome (profile {}, port {})",
            profile_dir.display(),
            self.config.debug_port
        );

        let mut cmd = Command::new(chrome_path);
        cmd.arg(format!("--remote-debugging-port={}", self.config.debug_port))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--window-size=1280,900")
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if !interactive && self.config.headless {
            cmd.arg("--headless=new");
        }

        let child = cmd
            .spawn()
            .map_err(|e| CdpError::ConnectionFailed(format!("Chrome launch: {}", e)))?;
        debug!("Chrome launched with PID {:?}", child.id());
        Ok(child)
    }

    /// Poll the debugging endpoint until Chrome answers.
    async fn wait_for_endpoint(&self) -> Result<(), OrderError> {
        let endpoint = self.config.endpoint();
        for _ in 0..ENDPOINT_ATTEMPTS {
            if reqwest::get(format!("{}/json/version", endpoint)).await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(ENDPOINT_POLL).await;
        }
        Err(CdpError::ChromeNotAvailable(endpoint).into())
    }

    /// Tear down the browser, invalidating the page handle. The next
    /// `ensure_page` recreates both.
    pub async fn teardown(&self) {
        *self.page.write().await = None;
        *self.client.write().await = None;

        if let Some(mut child) = self.chrome.write().await.take() {
            if let Err(e) = child.start_kill() {
                warn!("Failed to kill Chrome: {}", e);
            }
            let _ = child.wait().await;
            debug!("Chrome stopped");
        }
    }

    /// Open a fresh visible browser at the sign-in page and return guidance
    /// text. Does not block waiting for completion.
    pub async fn begin_interactive_login(&self) -> Result<String, OrderError> {
        self.teardown().await;
        let page = self.ensure_page(true).await?;
        page.navigate(menu::SIGNIN_URL).await?;
        Ok(
            "A browser window is open at the sign-in page. Sign in with your account, \
             then call order_complete_login to finish."
                .to_string(),
        )
    }

    /// Block (cooperatively) until the page reaches the authenticated area,
    /// then persist the cookie jar. Times out with `LoginTimeout`.
    pub async fn await_login_completion(&self, timeout: Duration) -> Result<String, OrderError> {
        let page = self.ensure_page(true).await?;

        let deadline = Instant::now() + timeout;
        loop {
            let url = page.current_url().await.unwrap_or_default();
            if is_authenticated_url(&url) {
                self.persist_cookies().await?;
                info!("Interactive sign-in completed at {}", url);
                return Ok("Signed in. The session has been saved.".to_string());
            }
            if Instant::now() >= deadline {
                return Err(OrderError::LoginTimeout(timeout.as_secs()));
            }
            tokio::time::sleep(LOGIN_POLL).await;
        }
    }

    /// Report authentication state from the persisted jar alone.
    ///
    /// This is a heuristic, not a live probe: stored cookies may have
    /// expired server-side. The ordering flow detects that reactively by
    /// probing for a sign-in control on the menu page.
    pub fn check_authenticated(&self) -> (bool, String) {
        let jar = self.load_cookie_jar();
        if jar.is_empty() {
            (
                false,
                "Not signed in. Use order_login to sign in interactively.".to_string(),
            )
        } else {
            (
                true,
                format!("Signed in ({} stored cookies).", jar.len()),
            )
        }
    }

    /// Headless credential sign-in.
    pub async fn auto_login(&self) -> Result<(), OrderError> {
        let credentials = self.config.credentials().ok_or_else(|| {
            OrderError::AutoLoginFailed(format!(
                "credentials not configured; set {} and {}",
                crate::config::EMAIL_ENV,
                crate::config::PASSWORD_ENV
            ))
        })?;

        let page = self.ensure_page(false).await?;
        page.navigate(menu::SIGNIN_URL).await?;

        page.wait_for_selector(menu::USERNAME_SELECTOR, AUTO_LOGIN_FORM_WAIT)
            .await
            .map_err(|_| OrderError::AutoLoginFailed("sign-in form did not load".to_string()))?;

        if !page.fill(menu::USERNAME_SELECTOR, &credentials.email).await?
            || !page.fill(menu::PASSWORD_SELECTOR, &credentials.password).await?
        {
            return Err(OrderError::AutoLoginFailed(
                "credential fields not found".to_string(),
            ));
        }
        if !page.click_selector(menu::SIGNIN_SUBMIT_SELECTOR).await? {
            return Err(OrderError::AutoLoginFailed(
                "submit control not found".to_string(),
            ));
        }

        let deadline = Instant::now() + AUTO_LOGIN_WAIT;
        loop {
            let url = page.current_url().await.unwrap_or_default();
            if is_authenticated_url(&url) {
                break;
            }
            if Instant::now() >= deadline {
                return Err(OrderError::AutoLoginFailed(
                    "sign-in did not complete in time".to_string(),
                ));
            }
            tokio::time::sleep(LOGIN_POLL).await;
        }

        self.persist_cookies().await?;
        info!("Automatic sign-in completed");
        Ok(())
    }

    /// Snapshot the browser's site cookies to the persisted jar.
    async fn persist_cookies(&self) -> Result<(), OrderError> {
        let client = self
            .client
            .read()
            .await
            .clone()
            .ok_or(CdpError::SessionClosed)?;

        let cookies: Vec<CookieRecord> = client
            .get_all_cookies()
            .await?
            .into_iter()
            .filter(|cookie| cookie.domain.contains("starbucks"))
            .collect();

        let path = self.config.cookie_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(&cookies)?)?;
        debug!("Persisted {} cookies to {}", cookies.len(), path.display());
        Ok(())
    }

    /// Read the persisted jar. Any missing or unreadable state is an empty
    /// jar, never an error.
    pub fn load_cookie_jar(&self) -> Vec<CookieRecord> {
        let path = self.config.cookie_path();
        match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring malformed cookie jar {}: {}", path.display(), e);
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }
}
