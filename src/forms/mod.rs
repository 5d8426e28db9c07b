//! Request composers, one submodule per Gotenberg module.
//!
//! Every operation is split in two:
//!
//! 1. a pure `*_request` function that validates its inputs and returns a
//!    [`ConversionRequest`] (endpoint + payload) without touching the network;
//! 2. an async method on the module's handle ([`Chromium`], [`LibreOffice`],
//!    [`PdfEngines`]) that builds the request and hands it to the transport.
//!
//! Validation therefore always fails fast: a missing file or a bad split mode
//! is reported before any connection is opened.
//!
//! | Submodule | Gotenberg routes |
//! |-----------|------------------|
//! | [`chromium`] | `/forms/chromium/convert/{url,html,markdown}`, `/forms/chromium/screenshot/url` |
//! | [`libreoffice`] | `/forms/libreoffice/convert` |
//! | [`pdfengines`] | `/forms/pdfengines/{merge,split,flatten,convert,metadata/read,metadata/write}` |

pub mod chromium;
pub mod libreoffice;
pub mod pdfengines;

pub use chromium::Chromium;
pub use libreoffice::LibreOffice;
pub use pdfengines::PdfEngines;

use crate::error::ValidationError;
use crate::files::FilePart;
use crate::payload::MultipartPayload;

/// A validated request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Route path, e.g. `/forms/pdfengines/merge`.
    pub endpoint: &'static str,
    pub payload: MultipartPayload,
}

impl ConversionRequest {
    pub(crate) fn new(endpoint: &'static str, payload: MultipartPayload) -> Self {
        Self { endpoint, payload }
    }
}

/// Reject an empty or whitespace-only text input.
pub(crate) fn require_text(value: &str, what: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { what });
    }
    Ok(())
}

/// Reject a file list shorter than `required`.
pub(crate) fn require_files(files: &[FilePart], required: usize) -> Result<(), ValidationError> {
    if files.len() < required {
        return Err(ValidationError::TooFewFiles {
            required,
            got: files.len(),
        });
    }
    Ok(())
}
