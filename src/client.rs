//! The Gotenberg client: health and version checks plus access to the
//! per-module composers.
//!
//! ```rust,no_run
//! use gotenberg_client::{GotenbergClient, PageOptions};
//!
//! # async fn run() -> Result<(), gotenberg_client::GotenbergError> {
//! let client = GotenbergClient::with_base_url("http://localhost:3000")?;
//! if client.is_healthy().await {
//!     let pdf = client
//!         .chromium()
//!         .convert_url("https://example.com", &PageOptions::a4(false))
//!         .await?;
//!     gotenberg_client::output::save(&pdf, "example.pdf").await?;
//! }
//! # Ok(())
//! # }
//! ```

use crate::config::ClientConfig;
use crate::error::GotenbergError;
use crate::forms::{Chromium, ConversionRequest, LibreOffice, PdfEngines};
use crate::transport::Transport;
use serde::Deserialize;
use std::future::Future;
use tracing::{debug, warn};

pub const HEALTH: &str = "/health";
pub const VERSION: &str = "/version";

/// Parsed body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    /// `"up"` when every Gotenberg module is ready.
    pub status: String,
    /// Per-module detail, passed through untouched.
    #[serde(default)]
    pub details: serde_json::Value,
}

impl HealthStatus {
    pub fn is_up(&self) -> bool {
        self.status == "up"
    }
}

/// Client for one Gotenberg instance.
///
/// Cloning is cheap and clones share the connection pool, so a single client
/// can be handed to many tasks converting concurrently.
#[derive(Debug, Clone)]
pub struct GotenbergClient {
    transport: Transport,
}

impl GotenbergClient {
    pub fn new(config: ClientConfig) -> Result<Self, GotenbergError> {
        debug!("Gotenberg client for {}", config.base_url);
        Ok(Self {
            transport: Transport::new(config)?,
        })
    }

    /// Configure from the `GOTENBERG_*` environment variables.
    pub fn from_env() -> Result<Self, GotenbergError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Default configuration pointed at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, GotenbergError> {
        Self::new(ClientConfig::builder().base_url(base_url).build()?)
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    /// URL, HTML and Markdown rendering, and screenshots.
    pub fn chromium(&self) -> Chromium<'_> {
        Chromium::new(self)
    }

    /// Office document conversion.
    pub fn libreoffice(&self) -> LibreOffice<'_> {
        LibreOffice::new(self)
    }

    /// Merge, split, flatten, metadata and PDF/A.
    pub fn pdf_engines(&self) -> PdfEngines<'_> {
        PdfEngines::new(self)
    }

    /// Send a request built by one of the `*_request` composers.
    pub async fn execute(&self, request: ConversionRequest) -> Result<Vec<u8>, GotenbergError> {
        self.transport
            .post(request.endpoint, request.payload)
            .await
    }

    /// `GET /health`, parsed.
    pub async fn health(&self) -> Result<HealthStatus, GotenbergError> {
        let body = self.transport.get(HEALTH).await?;
        serde_json::from_slice(&body).map_err(|e| GotenbergError::Service {
            status: None,
            message: format!("Malformed health response: {e}"),
        })
    }

    /// `true` iff `/health` answers with `"status": "up"`. Never fails.
    pub async fn is_healthy(&self) -> bool {
        match self.health().await {
            Ok(health) => health.is_up(),
            Err(e) => {
                warn!("Gotenberg health check failed: {}", e);
                false
            }
        }
    }

    /// `GET /version`, trimmed.
    pub async fn version(&self) -> Result<String, GotenbergError> {
        match self.transport.get(VERSION).await {
            Ok(body) => Ok(String::from_utf8_lossy(&body).trim().to_string()),
            Err(e) => Err(GotenbergError::Service {
                status: e.status(),
                message: format!("Failed to get Gotenberg version: {e}"),
            }),
        }
    }

    // ── Blocking wrappers ────────────────────────────────────────────────
    //
    // Each spins up a current-thread runtime. Inside an existing tokio
    // runtime they fail with `Service` instead.

    pub fn is_healthy_blocking(&self) -> bool {
        block_on(async { Ok::<_, GotenbergError>(self.is_healthy().await) }).unwrap_or(false)
    }

    pub fn version_blocking(&self) -> Result<String, GotenbergError> {
        block_on(self.version())
    }

    pub fn execute_blocking(&self, request: ConversionRequest) -> Result<Vec<u8>, GotenbergError> {
        block_on(self.execute(request))
    }
}

pub(crate) fn block_on<T>(
    fut: impl Future<Output = Result<T, GotenbergError>>,
) -> Result<T, GotenbergError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(GotenbergError::Service {
            status: None,
            message: "Blocking call made from inside an async runtime; use the async method"
                .to_string(),
        });
    }
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| GotenbergError::Service {
            status: None,
            message: format!("Failed to create tokio runtime: {e}"),
        })?
        .block_on(fut)
}
