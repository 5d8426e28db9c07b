//! Persisting converted payloads.

use crate::error::GotenbergError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write `bytes` to `path` atomically.
///
/// Parent directories are created first. The payload lands in a `.tmp`
/// sibling which is then renamed over `path`, so readers never observe a
/// half-written PDF.
pub async fn save(bytes: &[u8], path: impl AsRef<Path>) -> Result<(), GotenbergError> {
    let path = path.as_ref();
    let fail = |source: std::io::Error| GotenbergError::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(fail)?;
    }

    let tmp_path = tmp_sibling(path);
    tokio::fs::write(&tmp_path, bytes).await.map_err(fail)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(fail(e));
    }

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Blocking variant of [`save`].
pub fn save_blocking(bytes: &[u8], path: impl AsRef<Path>) -> Result<(), GotenbergError> {
    crate::client::block_on(save(bytes, path))
}

/// `report.pdf` → `report.pdf.tmp`
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}
