//! Connection parameters for a Zabbix server.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default lifetime of cached inventory lookups (10 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the client authenticates against the API.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// `user.login` with a user name and password; the session token is
    /// obtained lazily and refreshed when the server terminates the session.
    Password { user: String, password: String },
    /// A pre-issued API token sent with every request.
    Token(String),
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Password { user, .. } => f
                .debug_struct("Password")
                .field("user", user)
                .field("password", &"[REDACTED]")
                .finish(),
            AuthMode::Token(_) => f.debug_tuple("Token").field(&"[REDACTED]").finish(),
        }
    }
}

/// Everything needed to talk to one Zabbix frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Full URL of `api_jsonrpc.php`.
    pub url: String,
    /// Authentication mode.
    pub auth: AuthMode,
    /// Lifetime of cached inventory lookups.
    pub cache_ttl: Duration,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl ConnectionConfig {
    /// Creates a config with default cache TTL and timeout.
    pub fn new(url: impl Into<String>, auth: AuthMode) -> Self {
        Self {
            url: url.into(),
            auth,
            cache_ttl: DEFAULT_CACHE_TTL,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Sets the HTTP request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks that the URL is usable.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::Config("API URL is empty".to_string()));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "API URL must start with http:// or https://: {}",
                self.url
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = ConnectionConfig::new(
            "https://zabbix.example.com/api_jsonrpc.php",
            AuthMode::Token("abc".to_string()),
        );
        assert_eq!(config.cache_ttl, DEFAULT_CACHE_TTL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let config = ConnectionConfig::new("  ", AuthMode::Token("abc".to_string()));
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_missing_scheme() {
        let config = ConnectionConfig::new("zabbix/api_jsonrpc.php", AuthMode::Token("t".into()));
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_auth_mode_debug_redacts_secrets() {
        let auth = AuthMode::Password {
            user: "Admin".to_string(),
            password: "zabbix".to_string(),
        };
        let debug = format!("{:?}", auth);
        assert!(debug.contains("Admin"));
        assert!(!debug.contains("zabbix"));

        let token = format!("{:?}", AuthMode::Token("secret-token".to_string()));
        assert!(!token.contains("secret-token"));
    }
}
