//! HTTP transport: the only module that talks to the network.
//!
//! ## Status classification
//!
//! | Response | Result |
//! |----------|--------|
//! | 2xx | `Ok(body)` |
//! | 400, 403, 409, 503 | [`GotenbergError::Conversion`] |
//! | any other ≥ 400 (and 1xx/3xx that reqwest did not follow) | [`GotenbergError::Service`] |
//! | no response (DNS, TCP, TLS, timeout) | [`GotenbergError::Connection`] |
//!
//! ## Concurrency
//!
//! [`Transport`] wraps a single `reqwest::Client`, which is an `Arc`-backed
//! connection pool. It is `Send + Sync`, and clones share the pool, so one
//! transport can serve any number of concurrent conversions.

use crate::config::ClientConfig;
use crate::error::GotenbergError;
use crate::payload::MultipartPayload;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use std::time::Instant;
use tracing::{debug, info};

/// Header Gotenberg uses to correlate a request with its own logs.
pub const TRACE_HEADER: HeaderName = HeaderName::from_static("gotenberg-trace");

/// Pooled HTTP client bound to one Gotenberg base URL.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    config: ClientConfig,
}

impl Transport {
    /// Build the underlying reqwest client with the configured timeouts,
    /// user agent and trace header.
    pub fn new(config: ClientConfig) -> Result<Self, GotenbergError> {
        let mut headers = HeaderMap::new();
        if let Some(ref trace) = config.trace_header {
            let value = HeaderValue::from_str(trace).map_err(|e| {
                GotenbergError::InvalidConfig(format!("Invalid trace header value: {e}"))
            })?;
            headers.insert(TRACE_HEADER, value);
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| GotenbergError::InvalidConfig(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST `payload` as `multipart/form-data` to `endpoint` and return the
    /// response body.
    pub async fn post(
        &self,
        endpoint: &str,
        payload: MultipartPayload,
    ) -> Result<Vec<u8>, GotenbergError> {
        let url = self.config.endpoint_url(endpoint);
        debug!(
            "POST {} ({} fields, {} files)",
            url,
            payload.text_fields().len(),
            payload.file_parts().len()
        );

        let start = Instant::now();
        let form = payload.into_form().await?;
        let response = self.http.post(&url).multipart(form).send().await?;
        self.finish(endpoint, response, start).await
    }

    /// GET `endpoint` and return the response body.
    pub async fn get(&self, endpoint: &str) -> Result<Vec<u8>, GotenbergError> {
        let url = self.config.endpoint_url(endpoint);
        debug!("GET {}", url);

        let start = Instant::now();
        let response = self.http.get(&url).send().await?;
        self.finish(endpoint, response, start).await
    }

    async fn finish(
        &self,
        endpoint: &str,
        response: Response,
        start: Instant,
    ) -> Result<Vec<u8>, GotenbergError> {
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        let elapsed_ms = start.elapsed().as_millis() as u64;

        classify(status, &body)?;
        info!(
            "{} → {} ({} bytes, {}ms)",
            endpoint,
            status.as_u16(),
            body.len(),
            elapsed_ms
        );
        Ok(body)
    }
}

/// Map a response status to `Ok(())` or the matching error.
pub fn classify(status: StatusCode, body: &[u8]) -> Result<(), GotenbergError> {
    if status.is_success() {
        return Ok(());
    }
    let code = status.as_u16();
    let body = String::from_utf8_lossy(body).trim().to_string();
    match code {
        400 | 403 | 409 | 503 => Err(GotenbergError::Conversion { status: code, body }),
        _ => Err(GotenbergError::Service {
            status: Some(code),
            message: body,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).unwrap()
    }

    #[test]
    fn success_codes_pass() {
        for code in [200, 201, 204] {
            assert!(classify(status(code), b"").is_ok());
        }
    }

    #[test]
    fn conversion_codes() {
        for code in [400, 403, 409, 503] {
            let err = classify(status(code), b"Invalid form data\n").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Conversion, "code {code}");
            assert_eq!(err.status(), Some(code));
            assert!(err.to_string().contains("Invalid form data"));
        }
    }

    #[test]
    fn other_errors_are_service_errors() {
        for code in [401, 404, 413, 500, 502, 504] {
            let err = classify(status(code), b"nope").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Service, "code {code}");
            assert_eq!(err.to_string(), format!("HTTP {code}: nope"));
        }
    }

    #[test]
    fn redirects_are_not_success() {
        let err = classify(status(304), b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Service);
    }

    #[test]
    fn transport_builds_with_trace_header() {
        let config = ClientConfig::builder().trace_header("abc-123").build().unwrap();
        assert!(Transport::new(config).is_ok());
    }

    #[test]
    fn invalid_trace_header_is_config_error() {
        let config = ClientConfig::builder()
            .trace_header("bad\nvalue")
            .build()
            .unwrap();
        let err = Transport::new(config).unwrap_err();
        assert!(matches!(err, GotenbergError::InvalidConfig(_)));
    }
}
