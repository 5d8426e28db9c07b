//! Chromium routes: URL, HTML and Markdown to PDF, and URL screenshots.
//!
//! Gotenberg's HTML and Markdown routes render a file named `index.html`.
//! Assets referenced by that page (stylesheets, images, fonts) are uploaded
//! alongside it and resolved by filename, so `<img src="logo.png">` needs a
//! part called `logo.png`.

use crate::client::GotenbergClient;
use crate::error::GotenbergError;
use crate::files::{ensure_all_exist, FilePart};
use crate::forms::{require_text, ConversionRequest};
use crate::options::{FormOptions, PageOptions, ScreenshotOptions};
use crate::payload::MultipartPayload;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONVERT_URL: &str = "/forms/chromium/convert/url";
pub const CONVERT_HTML: &str = "/forms/chromium/convert/html";
pub const CONVERT_MARKDOWN: &str = "/forms/chromium/convert/markdown";
pub const SCREENSHOT_URL: &str = "/forms/chromium/screenshot/url";

/// Filename Gotenberg renders on the HTML and Markdown routes.
pub const INDEX_HTML: &str = "index.html";
/// Filename of the Markdown part on the Markdown route.
pub const CONTENT_MD: &str = "content.md";

/// Build a URL → PDF request.
pub fn url_request(url: &str, options: &PageOptions) -> Result<ConversionRequest, GotenbergError> {
    require_text(url, "URL")?;
    let payload = MultipartPayload::new()
        .field("url", url.trim())
        .options(options.build());
    Ok(ConversionRequest::new(CONVERT_URL, payload))
}

/// Build an HTML → PDF request from an in-memory page plus assets.
pub fn html_request(
    html: &str,
    assets: Vec<FilePart>,
    options: &PageOptions,
) -> Result<ConversionRequest, GotenbergError> {
    require_text(html, "HTML content")?;
    ensure_all_exist(&assets)?;
    let payload = MultipartPayload::new()
        .options(options.build())
        .file(FilePart::bytes(INDEX_HTML, html.as_bytes().to_vec()))
        .files(assets);
    Ok(ConversionRequest::new(CONVERT_HTML, payload))
}

/// Build an HTML → PDF request from files on disk.
///
/// The page is uploaded under its own base name; Gotenberg only renders a
/// file called `index.html`.
pub fn html_file_request(
    html_path: &Path,
    asset_paths: &[PathBuf],
    options: &PageOptions,
) -> Result<ConversionRequest, GotenbergError> {
    let mut parts = vec![FilePart::path(html_path)];
    parts.extend(asset_paths.iter().cloned().map(FilePart::Path));
    ensure_all_exist(&parts)?;
    let payload = MultipartPayload::new()
        .options(options.build())
        .files(parts);
    Ok(ConversionRequest::new(CONVERT_HTML, payload))
}

/// Build a Markdown → PDF request.
///
/// `template` becomes `index.html` and should pull the content in with
/// `{{ toHTML "content.md" }}`.
pub fn markdown_request(
    markdown: &str,
    template: &str,
    options: &PageOptions,
) -> Result<ConversionRequest, GotenbergError> {
    let payload = MultipartPayload::new()
        .options(options.build())
        .file(FilePart::bytes(INDEX_HTML, template.as_bytes().to_vec()))
        .file(FilePart::bytes(CONTENT_MD, markdown.as_bytes().to_vec()));
    Ok(ConversionRequest::new(CONVERT_MARKDOWN, payload))
}

/// Build a URL → image request.
pub fn screenshot_request(
    url: &str,
    options: &ScreenshotOptions,
) -> Result<ConversionRequest, GotenbergError> {
    require_text(url, "URL")?;
    let payload = MultipartPayload::new()
        .field("url", url.trim())
        .options(options.build());
    Ok(ConversionRequest::new(SCREENSHOT_URL, payload))
}

/// Handle for the Chromium routes. Obtain via [`GotenbergClient::chromium`].
#[derive(Debug, Clone, Copy)]
pub struct Chromium<'a> {
    client: &'a GotenbergClient,
}

impl<'a> Chromium<'a> {
    pub(crate) fn new(client: &'a GotenbergClient) -> Self {
        Self { client }
    }

    /// Render a remote page to PDF.
    pub async fn convert_url(
        &self,
        url: &str,
        options: &PageOptions,
    ) -> Result<Vec<u8>, GotenbergError> {
        debug!("Chromium URL conversion: {}", url);
        self.client.execute(url_request(url, options)?).await
    }

    /// Render an HTML string (plus assets) to PDF.
    pub async fn convert_html(
        &self,
        html: &str,
        assets: Vec<FilePart>,
        options: &PageOptions,
    ) -> Result<Vec<u8>, GotenbergError> {
        self.client
            .execute(html_request(html, assets, options)?)
            .await
    }

    /// Render an HTML file (plus asset files) to PDF.
    pub async fn convert_html_file(
        &self,
        html_path: impl AsRef<Path>,
        asset_paths: &[PathBuf],
        options: &PageOptions,
    ) -> Result<Vec<u8>, GotenbergError> {
        self.client
            .execute(html_file_request(html_path.as_ref(), asset_paths, options)?)
            .await
    }

    /// Render Markdown through an HTML template to PDF.
    pub async fn convert_markdown(
        &self,
        markdown: &str,
        template: &str,
        options: &PageOptions,
    ) -> Result<Vec<u8>, GotenbergError> {
        self.client
            .execute(markdown_request(markdown, template, options)?)
            .await
    }

    /// Capture a remote page as an image.
    pub async fn screenshot_url(
        &self,
        url: &str,
        options: &ScreenshotOptions,
    ) -> Result<Vec<u8>, GotenbergError> {
        debug!("Chromium screenshot: {}", url);
        self.client.execute(screenshot_request(url, options)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ValidationError};
    use std::io::Write;

    #[test]
    fn url_request_carries_url_and_page_defaults() {
        let req = url_request("https://example.com", &PageOptions::default().landscape(true)).unwrap();
        assert_eq!(req.endpoint, CONVERT_URL);
        assert_eq!(req.payload.get("url"), Some("https://example.com"));
        assert_eq!(req.payload.get("landscape"), Some("true"));
        assert_eq!(req.payload.get("paperWidth"), Some("8.5"));
        assert_eq!(req.payload.get("paperHeight"), Some("11"));
        assert_eq!(req.payload.get("marginTop"), Some("0.39"));
        assert_eq!(req.payload.get("printBackground"), Some("false"));
        assert_eq!(req.payload.get("scale"), Some("1"));
        assert!(req.payload.file_parts().is_empty());
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = url_request("   ", &PageOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            GotenbergError::Validation(ValidationError::Empty { what: "URL" })
        ));
        assert!(screenshot_request("", &ScreenshotOptions::default()).is_err());
    }

    #[test]
    fn html_request_puts_index_first_then_assets() {
        let req = html_request(
            "<h1>Hi</h1>",
            vec![
                FilePart::bytes("style.css", "h1{color:red}"),
                FilePart::bytes("logo.png", vec![0x89, b'P', b'N', b'G']),
            ],
            &PageOptions::default(),
        )
        .unwrap();
        assert_eq!(req.endpoint, CONVERT_HTML);
        assert_eq!(req.payload.filenames(), vec!["index.html", "style.css", "logo.png"]);
        match &req.payload.file_parts()[0].1 {
            FilePart::Bytes { content, .. } => assert_eq!(content, b"<h1>Hi</h1>"),
            other => panic!("unexpected part {other:?}"),
        }
    }

    #[test]
    fn empty_html_is_rejected() {
        let err = html_request("", Vec::new(), &PageOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn html_file_request_checks_every_path() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join("index.html");
        std::fs::File::create(&index)
            .unwrap()
            .write_all(b"<p>x</p>")
            .unwrap();

        let ok = html_file_request(&index, &[], &PageOptions::default()).unwrap();
        assert_eq!(ok.payload.filenames(), vec!["index.html"]);

        let missing = dir.path().join("style.css");
        let err = html_file_request(&index, &[missing.clone()], &PageOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            GotenbergError::Validation(ValidationError::FileNotFound { path }) if path == missing
        ));

        let err = html_file_request(&dir.path().join("nope.html"), &[], &PageOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn markdown_request_has_template_and_content() {
        let req = markdown_request(
            "# Title",
            "<html>{{ toHTML \"content.md\" }}</html>",
            &PageOptions::default(),
        )
        .unwrap();
        assert_eq!(req.endpoint, CONVERT_MARKDOWN);
        assert_eq!(req.payload.filenames(), vec![INDEX_HTML, CONTENT_MD]);
    }

    #[test]
    fn screenshot_request_uses_screenshot_family() {
        let req = screenshot_request(
            "https://github.com",
            &ScreenshotOptions::default().width(1200).height(800),
        )
        .unwrap();
        assert_eq!(req.endpoint, SCREENSHOT_URL);
        assert_eq!(req.payload.get("width"), Some("1200"));
        assert_eq!(req.payload.get("height"), Some("800"));
        assert_eq!(req.payload.get("format"), Some("png"));
        assert_eq!(req.payload.get("clip"), Some("false"));
        assert_eq!(req.payload.get("paperWidth"), None);
    }
}
