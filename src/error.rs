//! Error types for the gotenberg-client library.
//!
//! Every operation returns `Result<_, GotenbergError>`. The variants fall into
//! four kinds, reported by [`GotenbergError::kind`]:
//!
//! * **Validation**: a local precondition failed (missing file, bad split
//!   mode, too few PDFs). Raised before any network call.
//! * **Conversion**: Gotenberg rejected the request (HTTP 400, 403, 409, 503).
//! * **Service**: any other non-2xx response, or a body that could not be
//!   interpreted (e.g. metadata JSON that fails to parse).
//! * **Connection**: the HTTP exchange never produced a response (DNS, TCP,
//!   TLS, timeout).
//!
//! Nothing is retried. A caller that wants retries can match on
//! [`ErrorKind::Connection`] or [`ErrorKind::Conversion`] and decide.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the gotenberg-client library.
#[derive(Debug, Error)]
pub enum GotenbergError {
    // ── Local errors ──────────────────────────────────────────────────────
    /// A request failed local validation and was never sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Remote errors ─────────────────────────────────────────────────────
    /// Gotenberg answered 400, 403, 409 or 503.
    #[error("{}: HTTP {status}: {}", conversion_reason(.status), non_empty(.body))]
    Conversion { status: u16, body: String },

    /// Gotenberg answered with an unexpected status, or with a body we could
    /// not interpret.
    #[error("{}", service_message(.status, .message))]
    Service { status: Option<u16>, message: String },

    /// No response was received.
    #[error("Connection failed: {source}")]
    Connection {
        #[source]
        source: reqwest::Error,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// An input file exists but could not be opened or read.
    #[error("Failed to read input file '{path}': {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write a converted payload to disk.
    #[error("Failed to write output file '{path}': {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Local precondition failures. Always raised before the network is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An input file does not exist.
    #[error("File not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// A file handed to a PDF operation does not carry a `.pdf` extension.
    #[error("File is not a PDF: '{path}'")]
    NotAPdf { path: PathBuf },

    /// The operation needs more files than were given.
    #[error("At least {required} file(s) required, got {got}")]
    TooFewFiles { required: usize, got: usize },

    /// A required text input (URL, HTML, metadata, …) was empty.
    #[error("{what} must not be empty")]
    Empty { what: &'static str },

    /// Split mode was neither `intervals` nor `pages`.
    #[error("Split mode must be 'intervals' or 'pages', got '{0}'")]
    InvalidSplitMode(String),

    /// PDF/A target outside the supported set.
    #[error("Invalid PDF/A format '{0}'. Must be PDF/A-1b, PDF/A-2b, or PDF/A-3b")]
    UnsupportedPdfA(String),
}

/// Coarse classification of a [`GotenbergError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conversion,
    Service,
    Connection,
}

impl GotenbergError {
    /// Which of the four failure kinds this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GotenbergError::Validation(_)
            | GotenbergError::InvalidConfig(_)
            | GotenbergError::Input { .. } => ErrorKind::Validation,
            GotenbergError::Conversion { .. } => ErrorKind::Conversion,
            GotenbergError::Service { .. } | GotenbergError::Output { .. } => ErrorKind::Service,
            GotenbergError::Connection { .. } => ErrorKind::Connection,
        }
    }

    /// HTTP status carried by the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            GotenbergError::Conversion { status, .. } => Some(*status),
            GotenbergError::Service { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GotenbergError {
    fn from(source: reqwest::Error) -> Self {
        GotenbergError::Connection { source }
    }
}

fn conversion_reason(status: &u16) -> &'static str {
    match *status {
        400 => "Bad request",
        403 => "Forbidden",
        409 => "Conflict",
        503 => "Service unavailable",
        _ => "Conversion failed",
    }
}

fn service_message(status: &Option<u16>, message: &str) -> String {
    match *status {
        Some(code) => format!("HTTP {code}: {}", non_empty(message)),
        None => message.to_string(),
    }
}

fn non_empty(body: &str) -> &str {
    if body.trim().is_empty() {
        "Unknown error"
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_display_has_reason_status_and_body() {
        let e = GotenbergError::Conversion {
            status: 400,
            body: "invalid form data".into(),
        };
        let msg = e.to_string();
        assert_eq!(msg, "Bad request: HTTP 400: invalid form data");
        assert_eq!(e.kind(), ErrorKind::Conversion);
        assert_eq!(e.status(), Some(400));
    }

    #[test]
    fn conversion_display_with_empty_body() {
        let e = GotenbergError::Conversion {
            status: 503,
            body: String::new(),
        };
        assert_eq!(e.to_string(), "Service unavailable: HTTP 503: Unknown error");
    }

    #[test]
    fn service_display_with_and_without_status() {
        let e = GotenbergError::Service {
            status: Some(500),
            message: "boom".into(),
        };
        assert_eq!(e.to_string(), "HTTP 500: boom");

        let e = GotenbergError::Service {
            status: None,
            message: "Malformed metadata response".into(),
        };
        assert_eq!(e.to_string(), "Malformed metadata response");
        assert_eq!(e.status(), None);
    }

    #[test]
    fn validation_errors_classify_as_validation() {
        let e: GotenbergError = ValidationError::TooFewFiles { required: 2, got: 1 }.into();
        assert_eq!(e.kind(), ErrorKind::Validation);
        assert!(e.to_string().contains("At least 2"), "got: {e}");

        let e = GotenbergError::InvalidConfig("timeout".into());
        assert_eq!(e.kind(), ErrorKind::Validation);
    }

    #[test]
    fn pdfa_error_lists_supported_formats() {
        let e = ValidationError::UnsupportedPdfA("PDF/A-4".into());
        let msg = e.to_string();
        assert!(msg.contains("PDF/A-4"));
        assert!(msg.contains("PDF/A-1b"));
    }

    #[test]
    fn input_error_keeps_path_and_source() {
        let e = GotenbergError::Input {
            path: PathBuf::from("/srv/locked.docx"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(e.kind(), ErrorKind::Validation);
        assert!(e.to_string().starts_with("Failed to read input file '/srv/locked.docx'"));
        assert!(std::error::Error::source(&e).is_some());
    }
}
