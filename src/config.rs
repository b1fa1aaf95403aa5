//! Configuration for the Web Help Desk client.
//!
//! Configuration comes from environment variables (optionally via a `.env`
//! file loaded by the caller with `dotenvy`) or is built in code with
//! `Config::new` and the `with_*` builders.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::auth::Credentials;
use crate::error::WhdError;

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRY_MAX: u32 = 10;

/// Default initial delay between retries.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Configuration for connecting to Web Help Desk.
#[derive(Clone)]
pub struct Config {
    /// Server root (e.g., `https://helpdesk.example.com`), without trailing slash.
    pub base_url: String,

    /// How requests authenticate.
    /// The secret part must never be logged or included in error messages.
    pub credentials: Credentials,

    /// Whether TLS certificates are verified.
    pub ssl_verify: bool,

    /// Retries after the first attempt for transient failures.
    pub retry_max: u32,

    /// Initial backoff between retries; doubles on each retry.
    pub retry_backoff: Duration,
}

impl Config {
    /// Creates a configuration with default TLS and retry settings.
    ///
    /// # Errors
    ///
    /// Returns `WhdError::Config` if the base URL is not an http(s) URL.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self, WhdError> {
        Ok(Config {
            base_url: Self::validate_base_url(base_url.into())?,
            credentials,
            ssl_verify: true,
            retry_max: DEFAULT_RETRY_MAX,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        })
    }

    /// Sets whether TLS certificates are verified.
    pub fn with_ssl_verify(mut self, verify: bool) -> Self {
        self.ssl_verify = verify;
        self
    }

    /// Sets the number of retries after the first attempt.
    pub fn with_retry_max(mut self, retry_max: u32) -> Self {
        self.retry_max = retry_max;
        self
    }

    /// Sets the initial backoff between retries.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `WHD_BASE_URL` (required): server root
    /// - `WHD_API_KEY`: API key authentication, or
    /// - `WHD_USERNAME` with `WHD_PASSWORD` or `WHD_SESSION_KEY`
    /// - `WHD_SSL_VERIFY` (optional, default `true`)
    /// - `WHD_RETRY_MAX` (optional, default 10)
    ///
    /// # Errors
    ///
    /// Returns `WhdError::Config` if any required variable is missing
    /// or if values fail validation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// dotenvy::dotenv().ok();
    /// let config = Config::from_env()?;
    /// ```
    pub fn from_env() -> Result<Self, WhdError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    fn from_lookup<F>(lookup: F) -> Result<Self, WhdError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let base_url = get("WHD_BASE_URL").ok_or_else(|| WhdError::missing_env("WHD_BASE_URL"))?;
        let credentials = Self::credentials_from(&get)?;
        Self::validate_secret(credentials.secret())?;

        let mut config = Config::new(base_url, credentials)?;

        if let Some(raw) = get("WHD_SSL_VERIFY") {
            config.ssl_verify = Self::parse_bool("WHD_SSL_VERIFY", &raw)?;
        }

        if let Some(raw) = get("WHD_RETRY_MAX") {
            config.retry_max = raw.trim().parse().map_err(|_| {
                WhdError::invalid_config(format!(
                    "WHD_RETRY_MAX must be a non-negative integer, got {:?}",
                    raw
                ))
            })?;
        }

        Ok(config)
    }

    /// Picks the authentication scheme from whichever variables are set.
    ///
    /// An API key wins over a password, which wins over a session key.
    fn credentials_from<F>(get: &F) -> Result<Credentials, WhdError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = get("WHD_API_KEY") {
            return Ok(Credentials::api_key(key.trim()));
        }

        let username = get("WHD_USERNAME").map(|u| u.trim().to_string());

        if let Some(password) = get("WHD_PASSWORD") {
            let username = username.ok_or_else(|| WhdError::missing_env("WHD_USERNAME"))?;
            return Ok(Credentials::password(username, password));
        }

        if let Some(session_key) = get("WHD_SESSION_KEY") {
            return Ok(Credentials::session_key(username, session_key.trim()));
        }

        Err(WhdError::invalid_config(
            "no credentials: set WHD_API_KEY, or WHD_USERNAME with WHD_PASSWORD or WHD_SESSION_KEY",
        ))
    }

    fn parse_bool(name: &str, raw: &str) -> Result<bool, WhdError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(WhdError::invalid_config(format!(
                "{} must be a boolean, got {:?}",
                name, other
            ))),
        }
    }

    /// Validates and normalizes the base URL.
    fn validate_base_url(url: String) -> Result<String, WhdError> {
        let url = url.trim().trim_end_matches('/').to_string();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(WhdError::invalid_config(
                "WHD_BASE_URL must start with http:// or https://",
            ));
        }

        url::Url::parse(&url).map_err(|e| {
            WhdError::invalid_config(format!("WHD_BASE_URL is not a valid URL: {}", e))
        })?;

        Ok(url)
    }

    /// Validates the secret is not a placeholder value.
    fn validate_secret(secret: &str) -> Result<(), WhdError> {
        let lower = secret.to_lowercase();
        let placeholder_patterns = [
            "your_api_key",
            "your_key",
            "your_password",
            "placeholder",
            "xxx",
            "changeme",
        ];

        for pattern in placeholder_patterns {
            if lower.contains(pattern) {
                return Err(WhdError::invalid_config(
                    "WHD credentials appear to be a placeholder value",
                ));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("ssl_verify", &self.ssl_verify)
            .field("retry_max", &self.retry_max)
            .field("retry_backoff", &self.retry_backoff)
            .finish()
    }
}
