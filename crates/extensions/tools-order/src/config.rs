//! Configuration for the ordering extension.

use std::path::PathBuf;

/// Environment variable holding the sign-in email.
pub const EMAIL_ENV: &str = "STARBUCKS_EMAIL";

/// Environment variable holding the sign-in password.
pub const PASSWORD_ENV: &str = "STARBUCKS_PASSWORD";

/// Credentials for unattended sign-in.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Configuration for the ordering workflow.
#[derive(Debug, Clone)]
pub struct OrderConfig {
    /// Chrome remote debugging port.
    pub debug_port: u16,

    /// Run non-interactive sessions headless. Interactive login always opens
    /// a visible window regardless of this flag.
    pub headless: bool,

    /// Directory for persisted state (cookie jar, favorites), relative to
    /// the process working directory by default.
    pub state_dir: PathBuf,

    /// Chrome profile directory. Defaults to `~/.brewhands/browser-profile`.
    pub profile_dir: Option<PathBuf>,

    /// Explicit Chrome executable, overriding autodetection.
    pub chrome_path: Option<PathBuf>,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            debug_port: 9222,
            headless: true,
            state_dir: PathBuf::from(".brewhands"),
            profile_dir: None,
            chrome_path: None,
        }
    }
}

impl OrderConfig {
    /// Set the Chrome debugging port.
    pub fn debug_port(mut self, port: u16) -> Self {
        self.debug_port = port;
        self
    }

    /// Override headless mode for non-interactive sessions.
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the state directory.
    pub fn state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = dir.into();
        self
    }

    /// Set a custom Chrome profile directory.
    pub fn profile_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.profile_dir = Some(dir.into());
        self
    }

    /// HTTP endpoint of the Chrome debugging interface.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }

    /// Location of the persisted cookie jar.
    pub fn cookie_path(&self) -> PathBuf {
        self.state_dir.join("cookies.json")
    }

    /// Location of the persisted favorites file.
    pub fn favorites_path(&self) -> PathBuf {
        self.state_dir.join("favorites.json")
    }

    /// Resolved Chrome profile directory.
    pub fn resolved_profile_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.profile_dir {
            return dir.clone();
        }
        dirs::home_dir()
            .map(|home| home.join(".brewhands").join("browser-profile"))
            .unwrap_or_else(|| self.state_dir.join("browser-profile"))
    }

    /// Credentials from the environment, if both variables are set and
    /// non-empty.
    pub fn credentials(&self) -> Option<Credentials> {
        let email = std::env::var(EMAIL_ENV).ok().filter(|v| !v.is_empty())?;
        let password = std::env::var(PASSWORD_ENV).ok().filter(|v| !v.is_empty())?;
        Some(Credentials { email, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrderConfig::default();
        assert_eq!(config.debug_port, 9222);
        assert!(config.headless);
        assert_eq!(config.cookie_path(), PathBuf::from(".brewhands/cookies.json"));
        assert_eq!(
            config.favorites_path(),
            PathBuf::from(".brewhands/favorites.json")
        );
    }

    #[test]
    fn test_endpoint() {
        let config = OrderConfig::default().debug_port(9333);
        assert_eq!(config.endpoint(), "http://127.0.0.1:9333");
    }

    #[test]
    fn test_explicit_profile_dir_wins() {
        let config = OrderConfig::default().profile_dir("/tmp/profile");
        assert_eq!(config.resolved_profile_dir(), PathBuf::from("/tmp/profile"));
    }
}
