//! PDF-engine routes: merge, split, flatten, metadata and PDF/A conversion.

use crate::client::GotenbergClient;
use crate::error::{GotenbergError, ValidationError};
use crate::files::{ensure_all_exist, FilePart};
use crate::forms::{require_files, require_text, ConversionRequest};
use crate::options::{FormOptions, PdfAFormat, PdfEngineOptions};
use crate::payload::MultipartPayload;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const MERGE: &str = "/forms/pdfengines/merge";
pub const SPLIT: &str = "/forms/pdfengines/split";
pub const FLATTEN: &str = "/forms/pdfengines/flatten";
pub const CONVERT: &str = "/forms/pdfengines/convert";
pub const METADATA_READ: &str = "/forms/pdfengines/metadata/read";
pub const METADATA_WRITE: &str = "/forms/pdfengines/metadata/write";

/// PDF/A targets accepted by `/forms/pdfengines/convert`.
pub const PDFA_FORMATS: [PdfAFormat; 3] = PdfAFormat::ALL;

/// Well-known metadata keys and what they hold.
pub const COMMON_METADATA_FIELDS: &[(&str, &str)] = &[
    ("Title", "Document title"),
    ("Author", "Document author"),
    ("Subject", "Document subject"),
    ("Keywords", "Document keywords (array)"),
    ("Creator", "Application that created the document"),
    ("Producer", "Application that produced the PDF"),
    ("CreationDate", "Creation date (ISO 8601 format)"),
    ("ModDate", "Modification date (ISO 8601 format)"),
    ("Trapped", "Trapping information"),
];

/// Metadata returned by the read route, keyed by uploaded filename.
pub type PdfMetadata = BTreeMap<String, Map<String, Value>>;

/// How `splitSpan` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Span is a page count: one output per N pages.
    Intervals,
    /// Span is a page range expression, e.g. `1-3,5`.
    Pages,
}

impl SplitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SplitMode::Intervals => "intervals",
            SplitMode::Pages => "pages",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intervals" => Ok(SplitMode::Intervals),
            "pages" => Ok(SplitMode::Pages),
            other => Err(ValidationError::InvalidSplitMode(other.to_string())),
        }
    }
}

/// Existence first, then extension, for every file.
fn ensure_pdfs(files: &[FilePart]) -> Result<(), ValidationError> {
    files.iter().try_for_each(|f| {
        f.ensure_exists()?;
        f.ensure_pdf()
    })
}

/// Build a merge request. Needs at least two existing `.pdf` files.
pub fn merge_request(
    files: Vec<FilePart>,
    options: &PdfEngineOptions,
) -> Result<ConversionRequest, GotenbergError> {
    require_files(&files, 2)?;
    ensure_pdfs(&files)?;
    let payload = MultipartPayload::new()
        .options(options.build())
        .files(files);
    Ok(ConversionRequest::new(MERGE, payload))
}

/// Build a split request. `splitMode` and `splitSpan` precede the engine options.
pub fn split_request(
    file: FilePart,
    mode: SplitMode,
    span: &str,
    options: &PdfEngineOptions,
) -> Result<ConversionRequest, GotenbergError> {
    file.ensure_exists()?;
    require_text(span, "Split span")?;
    let payload = MultipartPayload::new()
        .field("splitMode", mode.as_str())
        .field("splitSpan", span.trim())
        .options(options.build())
        .file(file);
    Ok(ConversionRequest::new(SPLIT, payload))
}

/// Build a flatten request: one file, no fields.
pub fn flatten_request(file: FilePart) -> Result<ConversionRequest, GotenbergError> {
    file.ensure_exists()?;
    Ok(ConversionRequest::new(
        FLATTEN,
        MultipartPayload::new().file(file),
    ))
}

pub fn read_metadata_request(files: Vec<FilePart>) -> Result<ConversionRequest, GotenbergError> {
    require_files(&files, 1)?;
    ensure_all_exist(&files)?;
    Ok(ConversionRequest::new(
        METADATA_READ,
        MultipartPayload::new().files(files),
    ))
}

/// Build a metadata write request. The map is sent as one JSON field.
pub fn write_metadata_request(
    files: Vec<FilePart>,
    metadata: &Map<String, Value>,
) -> Result<ConversionRequest, GotenbergError> {
    require_files(&files, 1)?;
    if metadata.is_empty() {
        return Err(ValidationError::Empty { what: "Metadata" }.into());
    }
    ensure_all_exist(&files)?;
    let payload = MultipartPayload::new()
        .json_field("metadata", &Value::Object(metadata.clone()))
        .files(files);
    Ok(ConversionRequest::new(METADATA_WRITE, payload))
}

/// Build a PDF/A conversion request.
pub fn pdfa_request(
    files: Vec<FilePart>,
    format: PdfAFormat,
    pdfua: bool,
) -> Result<ConversionRequest, GotenbergError> {
    require_files(&files, 1)?;
    ensure_all_exist(&files)?;
    let payload = MultipartPayload::new()
        .field("pdfa", format.as_str())
        .field("pdfua", if pdfua { "true" } else { "false" })
        .files(files);
    Ok(ConversionRequest::new(CONVERT, payload))
}

/// Parse the read route's JSON body.
pub fn parse_metadata(body: &[u8]) -> Result<PdfMetadata, GotenbergError> {
    serde_json::from_slice(body).map_err(|e| GotenbergError::Service {
        status: None,
        message: format!("Malformed metadata response: {e}"),
    })
}

/// Handle for the PDF-engine routes. Obtain via [`GotenbergClient::pdf_engines`].
#[derive(Debug, Clone, Copy)]
pub struct PdfEngines<'a> {
    client: &'a GotenbergClient,
}

impl<'a> PdfEngines<'a> {
    pub(crate) fn new(client: &'a GotenbergClient) -> Self {
        Self { client }
    }

    pub async fn merge(
        &self,
        files: Vec<FilePart>,
        options: &PdfEngineOptions,
    ) -> Result<Vec<u8>, GotenbergError> {
        debug!("Merging {} PDF(s)", files.len());
        self.client.execute(merge_request(files, options)?).await
    }

    /// Split one PDF. Gotenberg returns a ZIP unless `split_unify` is set.
    pub async fn split(
        &self,
        file: impl Into<FilePart>,
        mode: SplitMode,
        span: &str,
        options: &PdfEngineOptions,
    ) -> Result<Vec<u8>, GotenbergError> {
        self.client
            .execute(split_request(file.into(), mode, span, options)?)
            .await
    }

    pub async fn flatten(&self, file: impl Into<FilePart>) -> Result<Vec<u8>, GotenbergError> {
        self.client.execute(flatten_request(file.into())?).await
    }

    pub async fn read_metadata(
        &self,
        files: Vec<FilePart>,
    ) -> Result<PdfMetadata, GotenbergError> {
        let body = self.client.execute(read_metadata_request(files)?).await?;
        parse_metadata(&body)
    }

    pub async fn write_metadata(
        &self,
        files: Vec<FilePart>,
        metadata: &Map<String, Value>,
    ) -> Result<Vec<u8>, GotenbergError> {
        self.client
            .execute(write_metadata_request(files, metadata)?)
            .await
    }

    pub async fn convert_to_pdfa(
        &self,
        files: Vec<FilePart>,
        format: PdfAFormat,
        pdfua: bool,
    ) -> Result<Vec<u8>, GotenbergError> {
        debug!("Converting {} file(s) to {}", files.len(), format);
        self.client
            .execute(pdfa_request(files, format, pdfua)?)
            .await
    }
}
