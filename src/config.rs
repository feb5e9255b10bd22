use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.sailthru.com";
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const API_KEY_VAR: &str = "SAILTHRU_API_KEY";
const API_SECRET_VAR: &str = "SAILTHRU_API_SECRET";
const BASE_URL_VAR: &str = "SAILTHRU_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
}

/// API key and shared secret for one account.
///
/// The secret is only used to compute request signatures and never leaves
/// the process.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
        }
    }

    /// Load credentials from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key =
            std::env::var(API_KEY_VAR).map_err(|_| ConfigError::MissingVar(API_KEY_VAR))?;
        let secret =
            std::env::var(API_SECRET_VAR).map_err(|_| ConfigError::MissingVar(API_SECRET_VAR))?;

        Ok(Self::new(api_key, secret))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Connection settings, read once when a [`crate::Client`] is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub dial_timeout: Duration,
    pub tls_handshake_timeout: Duration,
    /// Upper bound for a whole request, body included.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            tls_handshake_timeout: DEFAULT_TLS_HANDSHAKE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Defaults, with `SAILTHRU_BASE_URL` overriding the base URL when set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let config = Self::default();
        match std::env::var(BASE_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url),
            _ => config,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = timeout;
        self
    }

    pub fn with_tls_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.tls_handshake_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// reqwest's connect phase spans both the TCP dial and the TLS handshake.
    pub(crate) fn connect_timeout(&self) -> Duration {
        self.dial_timeout.saturating_add(self.tls_handshake_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_legacy_policy() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.sailthru.com");
        assert_eq!(config.dial_timeout, Duration::from_secs(10));
        assert_eq!(config.tls_handshake_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.connect_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn builder_overrides_fields() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:8080")
            .with_dial_timeout(Duration::from_secs(1))
            .with_tls_handshake_timeout(Duration::from_secs(2))
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.connect_timeout(), Duration::from_secs(3));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    // Environment variables are process-wide, so every case lives in one test.
    #[test]
    fn loads_settings_from_environment() {
        std::env::set_var(API_KEY_VAR, "env-key");
        std::env::remove_var(API_SECRET_VAR);
        let err = Credentials::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("SAILTHRU_API_SECRET")));
        assert_eq!(
            err.to_string(),
            "SAILTHRU_API_SECRET environment variable is required"
        );

        std::env::set_var(API_SECRET_VAR, "env-secret");
        let credentials = Credentials::from_env().unwrap();
        assert_eq!(credentials, Credentials::new("env-key", "env-secret"));

        std::env::remove_var(API_KEY_VAR);
        assert!(matches!(
            Credentials::from_env(),
            Err(ConfigError::MissingVar("SAILTHRU_API_KEY"))
        ));

        std::env::set_var(BASE_URL_VAR, "https://api.staging.example.com");
        assert_eq!(
            ClientConfig::from_env().base_url,
            "https://api.staging.example.com"
        );

        std::env::set_var(BASE_URL_VAR, "   ");
        assert_eq!(ClientConfig::from_env(), ClientConfig::default());

        std::env::remove_var(BASE_URL_VAR);
        std::env::remove_var(API_SECRET_VAR);
        assert_eq!(ClientConfig::from_env(), ClientConfig::default());
    }

    #[test]
    fn debug_redacts_secret() {
        let credentials = Credentials::new("abc", "topsecret");
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("abc"));
        assert!(!rendered.contains("topsecret"));
    }
}
