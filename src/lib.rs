//! # gotenberg-client
//!
//! Async Rust client for [Gotenberg](https://gotenberg.dev), the Docker-based
//! HTTP API that turns URLs, HTML, Markdown and office documents into PDF and
//! manipulates existing PDFs.
//!
//! Gotenberg does all rendering. This crate's job is to turn typed requests
//! into the `multipart/form-data` bodies Gotenberg expects (defaults filled
//! in, booleans sent as `"true"`/`"false"`, empty `pdfa` dropped), validate
//! local inputs before anything is sent, and classify what comes back.
//!
//! ## Request flow
//!
//! ```text
//! PageOptions / OfficeOptions / …
//!  │
//!  ├─ 1. Options   typed struct → family defaults → wire strings
//!  ├─ 2. Compose   validate inputs, assemble fields + file parts
//!  ├─ 3. Transport POST multipart, stream files from disk
//!  └─ 4. Classify  2xx → bytes │ 400/403/409/503 → Conversion │ other → Service
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gotenberg_client::{GotenbergClient, OfficeOptions, PageOptions};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // GOTENBERG_URL, defaults to http://localhost:3000
//!     let client = GotenbergClient::from_env()?;
//!
//!     let pdf = client
//!         .chromium()
//!         .convert_url("https://example.com", &PageOptions::default().landscape(true))
//!         .await?;
//!     gotenberg_client::output::save(&pdf, "example.pdf").await?;
//!
//!     let pdf = client
//!         .libreoffice()
//!         .convert_paths(&[PathBuf::from("report.docx")], &OfficeOptions::high_quality())
//!         .await?;
//!     gotenberg_client::output::save(&pdf, "report.pdf").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `gotenberg` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! gotenberg-client = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod files;
pub mod forms;
pub mod options;
pub mod output;
pub mod payload;
pub mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{GotenbergClient, HealthStatus};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ErrorKind, GotenbergError, ValidationError};
pub use files::FilePart;
pub use forms::pdfengines::{PdfMetadata, SplitMode};
pub use forms::ConversionRequest;
pub use options::{
    build, ConversionOptions, FormFamily, FormOptions, FormValue, OfficeOptions, PageOptions,
    PdfAFormat, PdfEngineOptions, RawOptions, ScreenshotFormat, ScreenshotOptions,
};
pub use payload::MultipartPayload;
