//! LibreOffice route: office documents to PDF.

use crate::client::GotenbergClient;
use crate::error::GotenbergError;
use crate::files::{ensure_all_exist, FilePart};
use crate::forms::{require_files, ConversionRequest};
use crate::options::{FormOptions, OfficeOptions};
use crate::payload::MultipartPayload;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONVERT: &str = "/forms/libreoffice/convert";

/// Extensions LibreOffice is known to import.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    // documents
    "doc", "docx", "docm", "dot", "dotx", "dotm", "odt", "ott", "rtf", "txt",
    // spreadsheets
    "xls", "xlsx", "xlsm", "xlsb", "xlt", "xltx", "xltm", "ods", "ots", "csv",
    // presentations
    "ppt", "pptx", "pptm", "pot", "potx", "potm", "pps", "ppsx", "odp", "otp",
    // other
    "pdf", "html", "htm", "epub", "pages", "numbers", "key",
];

/// Whether `filename`'s extension is in [`SUPPORTED_EXTENSIONS`] (case-insensitive).
///
/// ```rust
/// use gotenberg_client::forms::libreoffice::is_extension_supported;
///
/// assert!(is_extension_supported("Report.DOCX"));
/// assert!(!is_extension_supported("archive.zip"));
/// ```
pub fn is_extension_supported(filename: impl AsRef<Path>) -> bool {
    filename
        .as_ref()
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Build an office → PDF request. Accepts any mix of paths and in-memory parts.
///
/// Unsupported extensions are logged and still sent; Gotenberg has the
/// final word on what it can import.
pub fn convert_request(
    files: Vec<FilePart>,
    options: &OfficeOptions,
) -> Result<ConversionRequest, GotenbergError> {
    require_files(&files, 1)?;
    ensure_all_exist(&files)?;
    for part in &files {
        let name = part.filename();
        if !is_extension_supported(&name) {
            warn!("{} has an extension LibreOffice may not import", name);
        }
    }
    let payload = MultipartPayload::new()
        .options(options.build())
        .files(files);
    Ok(ConversionRequest::new(CONVERT, payload))
}

/// Handle for the LibreOffice route. Obtain via [`GotenbergClient::libreoffice`].
#[derive(Debug, Clone, Copy)]
pub struct LibreOffice<'a> {
    client: &'a GotenbergClient,
}

impl<'a> LibreOffice<'a> {
    pub(crate) fn new(client: &'a GotenbergClient) -> Self {
        Self { client }
    }

    /// Convert documents to PDF. With several files and `merge` unset,
    /// Gotenberg answers with a ZIP archive.
    pub async fn convert(
        &self,
        files: Vec<FilePart>,
        options: &OfficeOptions,
    ) -> Result<Vec<u8>, GotenbergError> {
        debug!("LibreOffice conversion of {} file(s)", files.len());
        self.client.execute(convert_request(files, options)?).await
    }

    pub async fn convert_paths(
        &self,
        paths: &[PathBuf],
        options: &OfficeOptions,
    ) -> Result<Vec<u8>, GotenbergError> {
        let files = paths.iter().cloned().map(FilePart::Path).collect();
        self.convert(files, options).await
    }

    /// Convert `(filename, bytes)` uploads already held in memory.
    pub async fn convert_uploads(
        &self,
        uploads: Vec<(String, Vec<u8>)>,
        options: &OfficeOptions,
    ) -> Result<Vec<u8>, GotenbergError> {
        let files = uploads
            .into_iter()
            .map(|(name, content)| FilePart::bytes(name, content))
            .collect();
        self.convert(files, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::options::PdfAFormat;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_extension_supported("q3.xlsx"));
        assert!(is_extension_supported("/tmp/Slides.PPTX"));
        assert!(is_extension_supported("notes.txt"));
        assert!(!is_extension_supported("image.png"));
        assert!(!is_extension_supported("Makefile"));
    }

    #[test]
    fn no_files_is_rejected() {
        let err = convert_request(Vec::new(), &OfficeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            GotenbergError::Validation(ValidationError::TooFewFiles { required: 1, got: 0 })
        ));
    }

    #[test]
    fn missing_path_is_rejected() {
        let err = convert_request(
            vec![FilePart::path("/no/such/report.docx")],
            &OfficeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GotenbergError::Validation(ValidationError::FileNotFound { .. })
        ));
    }

    #[test]
    fn mixed_parts_share_the_files_field() {
        let tmp = tempfile::Builder::new().suffix(".odt").tempfile().unwrap();
        let req = convert_request(
            vec![
                FilePart::path(tmp.path()),
                FilePart::bytes("budget.xlsx", vec![1, 2, 3]),
            ],
            &OfficeOptions::default().merge(true),
        )
        .unwrap();
        assert_eq!(req.endpoint, CONVERT);
        assert_eq!(req.payload.file_parts().len(), 2);
        assert_eq!(req.payload.filenames()[1], "budget.xlsx");
        assert_eq!(req.payload.get("merge"), Some("true"));
        assert_eq!(req.payload.get("exportFormFields"), Some("true"));
        assert_eq!(req.payload.get("quality"), Some("90"));
        assert_eq!(req.payload.get("pdfa"), None);
    }

    #[test]
    fn compressed_preset_reaches_the_payload() {
        let req = convert_request(
            vec![FilePart::bytes("a.docx", Vec::new())],
            &OfficeOptions::compressed().pdfa(PdfAFormat::A2b),
        )
        .unwrap();
        assert_eq!(req.payload.get("quality"), Some("50"));
        assert_eq!(req.payload.get("maxImageResolution"), Some("150"));
        assert_eq!(req.payload.get("reduceImageResolution"), Some("true"));
        assert_eq!(req.payload.get("pdfa"), Some("PDF/A-2b"));
    }

    #[test]
    fn unsupported_extension_is_still_sent() {
        let req = convert_request(
            vec![FilePart::bytes("diagram.png", vec![0x89, b'P', b'N', b'G'])],
            &OfficeOptions::default(),
        )
        .unwrap();
        assert_eq!(req.payload.filenames(), vec!["diagram.png"]);
    }
}
