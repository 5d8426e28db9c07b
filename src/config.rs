//! Client configuration.
//!
//! Everything that shapes the HTTP layer lives in [`ClientConfig`], built via
//! [`ClientConfigBuilder`] or read from the environment with
//! [`ClientConfig::from_env`]. Per-request conversion options are not here;
//! they belong to the typed option structs in [`crate::options`].

use crate::error::GotenbergError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Connection settings for a Gotenberg instance.
///
/// # Example
/// ```rust
/// use gotenberg_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://gotenberg:3000")
///     .timeout_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "http://gotenberg:3000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root URL of the Gotenberg service, without a trailing slash.
    /// Default: `http://localhost:3000`.
    pub base_url: String,

    /// Total request timeout in seconds, covering connect, upload, rendering
    /// and download. Default: 30.
    ///
    /// Chromium conversions of heavy pages and large LibreOffice batches can
    /// take well over the default; raise this rather than retrying.
    pub timeout_secs: u64,

    /// TCP/TLS connect timeout in seconds. Default: 10.
    pub connect_timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Value for the `Gotenberg-Trace` header, which Gotenberg echoes into
    /// its own logs. Default: None.
    pub trace_header: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!("gotenberg-client/", env!("CARGO_PKG_VERSION")).to_string(),
            trace_header: None,
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Read the configuration from `GOTENBERG_URL`, `GOTENBERG_TIMEOUT`,
    /// `GOTENBERG_CONNECT_TIMEOUT` and `GOTENBERG_TRACE`.
    ///
    /// Unset or empty variables keep their defaults. A timeout that does not
    /// parse as an integer is a configuration error.
    pub fn from_env() -> Result<Self, GotenbergError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GotenbergError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut builder = Self::builder();

        if let Some(url) = get("GOTENBERG_URL") {
            builder = builder.base_url(url);
        }
        if let Some(secs) = get("GOTENBERG_TIMEOUT") {
            builder = builder.timeout_secs(parse_secs("GOTENBERG_TIMEOUT", &secs)?);
        }
        if let Some(secs) = get("GOTENBERG_CONNECT_TIMEOUT") {
            builder = builder.connect_timeout_secs(parse_secs("GOTENBERG_CONNECT_TIMEOUT", &secs)?);
        }
        if let Some(trace) = get("GOTENBERG_TRACE") {
            builder = builder.trace_header(trace);
        }

        builder.build()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Join the base URL and an endpoint path (`/forms/...`).
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

fn parse_secs(var: &str, value: &str) -> Result<u64, GotenbergError> {
    value.trim().parse().map_err(|_| {
        GotenbergError::InvalidConfig(format!("{var} must be a whole number of seconds, got '{value}'"))
    })
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.config.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn trace_header(mut self, trace: impl Into<String>) -> Self {
        self.config.trace_header = Some(trace.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, GotenbergError> {
        let c = &self.config;
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(GotenbergError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                c.base_url
            )));
        }
        if c.timeout_secs == 0 {
            return Err(GotenbergError::InvalidConfig(
                "Timeout must be ≥ 1 second".into(),
            ));
        }
        if c.connect_timeout_secs == 0 {
            return Err(GotenbergError::InvalidConfig(
                "Connect timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
