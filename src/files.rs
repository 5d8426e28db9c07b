//! File parts attached to a Gotenberg request.
//!
//! A [`FilePart`] is either bytes already in memory (an HTML string, an
//! upload) or a path on local storage. Paths are checked for existence up
//! front by the composers and streamed from disk only when the request is
//! actually sent, so large office documents are never buffered whole.

use crate::error::{GotenbergError, ValidationError};
use reqwest::multipart::Part;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePart {
    /// Bytes in memory, sent under `filename`.
    Bytes { filename: String, content: Vec<u8> },
    /// A file on disk, sent under its base name.
    Path(PathBuf),
}

impl FilePart {
    pub fn bytes(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        FilePart::Bytes {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        FilePart::Path(path.into())
    }

    /// Name Gotenberg sees in the `filename` parameter.
    pub fn filename(&self) -> String {
        match self {
            FilePart::Bytes { filename, .. } => filename.clone(),
            FilePart::Path(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.to_string_lossy().into_owned()),
        }
    }

    /// Lower-cased extension of [`Self::filename`], without the dot.
    pub fn extension(&self) -> Option<String> {
        let name = self.filename();
        Path::new(&name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    /// Fail with `FileNotFound` when a path-backed part does not exist.
    /// In-memory parts always pass.
    pub fn ensure_exists(&self) -> Result<(), ValidationError> {
        match self {
            FilePart::Path(p) if !p.is_file() => Err(ValidationError::FileNotFound { path: p.clone() }),
            _ => Ok(()),
        }
    }

    /// Fail with `NotAPdf` unless the filename ends in `.pdf`.
    pub fn ensure_pdf(&self) -> Result<(), ValidationError> {
        if self.extension().as_deref() == Some("pdf") {
            return Ok(());
        }
        let path = match self {
            FilePart::Path(p) => p.clone(),
            FilePart::Bytes { filename, .. } => PathBuf::from(filename),
        };
        Err(ValidationError::NotAPdf { path })
    }

    /// Turn the part into a reqwest multipart part, opening path-backed files
    /// for streaming.
    pub(crate) async fn into_part(self) -> Result<Part, GotenbergError> {
        let filename = self.filename();
        match self {
            FilePart::Bytes { content, .. } => Ok(Part::bytes(content).file_name(filename)),
            FilePart::Path(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .map_err(|e| read_error(&path, e))?;
                let len = file
                    .metadata()
                    .await
                    .map_err(|e| read_error(&path, e))?
                    .len();
                debug!("Streaming {} ({} bytes)", path.display(), len);
                Ok(Part::stream_with_length(file, len).file_name(filename))
            }
        }
    }
}

impl From<PathBuf> for FilePart {
    fn from(p: PathBuf) -> Self {
        FilePart::Path(p)
    }
}

impl From<&Path> for FilePart {
    fn from(p: &Path) -> Self {
        FilePart::Path(p.to_path_buf())
    }
}

impl From<&str> for FilePart {
    fn from(p: &str) -> Self {
        FilePart::Path(PathBuf::from(p))
    }
}

/// A vanished file is still `FileNotFound`; any other I/O failure keeps its
/// cause.
fn read_error(path: &Path, source: std::io::Error) -> GotenbergError {
    match source.kind() {
        std::io::ErrorKind::NotFound => ValidationError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into(),
        _ => GotenbergError::Input {
            path: path.to_path_buf(),
            source,
        },
    }
}

/// Check existence of every part, stopping at the first missing path.
pub fn ensure_all_exist(parts: &[FilePart]) -> Result<(), ValidationError> {
    parts.iter().try_for_each(FilePart::ensure_exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn filename_of_path_is_base_name() {
        let part = FilePart::path("/tmp/reports/q3.docx");
        assert_eq!(part.filename(), "q3.docx");
        assert_eq!(part.extension().as_deref(), Some("docx"));
    }

    #[test]
    fn extension_is_lowercased() {
        let part = FilePart::bytes("SCAN.PDF", b"%PDF".to_vec());
        assert_eq!(part.extension().as_deref(), Some("pdf"));
        assert!(part.ensure_pdf().is_ok());
    }

    #[test]
    fn ensure_pdf_rejects_other_extensions() {
        let err = FilePart::path("/tmp/notes.txt").ensure_pdf().unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotAPdf {
                path: PathBuf::from("/tmp/notes.txt")
            }
        );
        assert!(FilePart::bytes("noext", Vec::new()).ensure_pdf().is_err());
    }

    #[test]
    fn missing_path_fails_existence_check() {
        let err = FilePart::path("/definitely/not/here.pdf")
            .ensure_exists()
            .unwrap_err();
        assert!(matches!(err, ValidationError::FileNotFound { .. }));
    }

    #[test]
    fn bytes_always_exist() {
        assert!(FilePart::bytes("index.html", "<p>hi</p>").ensure_exists().is_ok());
    }

    #[test]
    fn ensure_all_exist_reports_first_missing() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.7").unwrap();
        let parts = vec![
            FilePart::path(tmp.path()),
            FilePart::path("/missing/a.pdf"),
            FilePart::path("/missing/b.pdf"),
        ];
        let err = ensure_all_exist(&parts).unwrap_err();
        assert_eq!(
            err,
            ValidationError::FileNotFound {
                path: PathBuf::from("/missing/a.pdf")
            }
        );
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FilePart::path(dir.path()).ensure_exists().is_err());
    }

    #[test]
    fn read_errors_keep_their_cause() {
        let path = Path::new("/srv/in/report.docx");

        let err = read_error(path, std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(matches!(
            err,
            GotenbergError::Validation(ValidationError::FileNotFound { .. })
        ));

        let err = read_error(path, std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        match err {
            GotenbergError::Input { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected Input, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn streaming_a_missing_file_reports_not_found() {
        let err = FilePart::path("/definitely/not/here.pdf")
            .into_part()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GotenbergError::Validation(ValidationError::FileNotFound { .. })
        ));
    }
}
