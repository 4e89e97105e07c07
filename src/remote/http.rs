//! Reqwest-backed transport
//!
//! Production implementation of the `Transport` capability. Cache-level
//! hints are honored as `Cache-Control` request directives; per-call
//! timeouts, TLS-scheme enforcement and download handling live here so
//! callers above the trait never touch reqwest types.

use async_trait::async_trait;
use directories::ProjectDirs;
use reqwest::header;
use reqwest::Client;
use std::path::PathBuf;
use tracing::warn;

use crate::remote::transport::{
    CacheLevel, CallOptions, FetchOutcome, HttpMethod, Transport, TransportError,
};

/// Transport implementation backed by a reqwest HTTP client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// HTTP client for making requests
    client: Client,
    /// Directory downloaded resources are written into
    download_dir: PathBuf,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    /// Creates a transport with a default client and download directory
    ///
    /// Downloads land in the platform data directory for the application,
    /// falling back to the system temp directory when no home exists.
    pub fn new() -> Self {
        let download_dir = ProjectDirs::from("", "", "cinedata")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(std::env::temp_dir);

        Self {
            client: Client::new(),
            download_dir,
        }
    }

    /// Creates a transport with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            ..Self::new()
        }
    }

    /// Overrides the download directory
    pub fn with_download_dir(mut self, download_dir: PathBuf) -> Self {
        self.download_dir = download_dir;
        self
    }

    /// Builds and sends the request, mapping every failure mode to a
    /// `TransportError`
    async fn send(
        &self,
        url: &str,
        default_method: HttpMethod,
        body: Option<&str>,
        options: &CallOptions,
    ) -> Result<reqwest::Response, TransportError> {
        if options.secure && url.starts_with("http://") {
            return Err(TransportError::Insecure {
                url: url.to_string(),
            });
        }

        let method = options.method.unwrap_or(default_method);
        let mut request = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };

        if let Some(directive) = cache_control_value(options.cache_level) {
            request = request.header(header::CACHE_CONTROL, directive);
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            // RFC 7234: a cache answers an unsatisfiable only-if-cached
            // request with 504 Gateway Timeout
            if options.cache_level == CacheLevel::CacheOnly && status.as_u16() == 504 {
                return Err(TransportError::CacheMiss {
                    url: url.to_string(),
                });
            }

            let body = response.text().await.ok().filter(|text| !text.is_empty());
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch_json(&self, url: &str, options: CallOptions) -> FetchOutcome<String> {
        match self.send(url, HttpMethod::Get, None, &options).await {
            Ok(response) => match response.text().await {
                Ok(text) => FetchOutcome::success(url, text),
                Err(e) => FetchOutcome::failure(url, classify_request_error(url, e)),
            },
            Err(error) => {
                warn!(url, %error, "JSON fetch failed");
                FetchOutcome::failure(url, error)
            }
        }
    }

    async fn fetch_json_with_body(
        &self,
        url: &str,
        body: &str,
        options: CallOptions,
    ) -> FetchOutcome<String> {
        match self.send(url, HttpMethod::Post, Some(body), &options).await {
            Ok(response) => match response.text().await {
                Ok(text) => FetchOutcome::success(url, text),
                Err(e) => FetchOutcome::failure(url, classify_request_error(url, e)),
            },
            Err(error) => {
                warn!(url, %error, "JSON fetch with body failed");
                FetchOutcome::failure(url, error)
            }
        }
    }

    async fn download_to_file(
        &self,
        url: &str,
        destination_name: &str,
        options: CallOptions,
    ) -> FetchOutcome<PathBuf> {
        let response = match self.send(url, HttpMethod::Get, None, &options).await {
            Ok(response) => response,
            Err(error) => {
                warn!(url, %error, "download failed");
                return FetchOutcome::failure(url, error);
            }
        };

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return FetchOutcome::failure(url, classify_request_error(url, e)),
        };

        let path = self.download_dir.join(destination_name);
        let write_result = async {
            tokio::fs::create_dir_all(&self.download_dir).await?;
            tokio::fs::write(&path, &bytes).await
        }
        .await;

        match write_result {
            Ok(()) => FetchOutcome::success(url, path),
            Err(e) => FetchOutcome::failure(
                url,
                TransportError::Io {
                    url: url.to_string(),
                    message: e.to_string(),
                },
            ),
        }
    }

    async fn fetch_bytes(&self, url: &str, options: CallOptions) -> FetchOutcome<Vec<u8>> {
        match self.send(url, HttpMethod::Get, None, &options).await {
            Ok(response) => match response.bytes().await {
                Ok(bytes) => FetchOutcome::success(url, bytes.to_vec()),
                Err(e) => FetchOutcome::failure(url, classify_request_error(url, e)),
            },
            Err(error) => {
                warn!(url, %error, "byte fetch failed");
                FetchOutcome::failure(url, error)
            }
        }
    }
}

/// Maps a cache-level hint to its `Cache-Control` request directive
///
/// `Default` sends no directive; eviction semantics (`NoCacheNoStore`)
/// reduce to `no-store` since an HTTP request cannot purge intermediary
/// caches directly.
fn cache_control_value(cache_level: CacheLevel) -> Option<&'static str> {
    match cache_level {
        CacheLevel::Default => None,
        CacheLevel::BypassCache => Some("no-cache, no-store"),
        CacheLevel::CacheOnly => Some("only-if-cached"),
        CacheLevel::CacheIfAvailable => Some("max-stale"),
        CacheLevel::Revalidate => Some("no-cache"),
        CacheLevel::Reload => Some("no-cache"),
        CacheLevel::NoCacheNoStore => Some("no-store, max-age=0"),
    }
}

/// Maps a reqwest error to the transport error taxonomy
fn classify_request_error(url: &str, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_control_mapping() {
        assert_eq!(cache_control_value(CacheLevel::Default), None);
        assert_eq!(
            cache_control_value(CacheLevel::BypassCache),
            Some("no-cache, no-store")
        );
        assert_eq!(
            cache_control_value(CacheLevel::CacheOnly),
            Some("only-if-cached")
        );
        assert_eq!(
            cache_control_value(CacheLevel::CacheIfAvailable),
            Some("max-stale")
        );
        assert_eq!(cache_control_value(CacheLevel::Revalidate), Some("no-cache"));
        assert_eq!(cache_control_value(CacheLevel::Reload), Some("no-cache"));
        assert_eq!(
            cache_control_value(CacheLevel::NoCacheNoStore),
            Some("no-store, max-age=0")
        );
    }

    #[tokio::test]
    async fn test_secure_rejects_plain_http_before_sending() {
        let transport = ReqwestTransport::new();

        let outcome = transport
            .fetch_json("http://insecure.example.org/data", CallOptions::default())
            .await;

        assert!(
            matches!(outcome.result, Err(TransportError::Insecure { .. })),
            "Plain HTTP should be rejected under the default secure flag: {:?}",
            outcome.result
        );
        assert_eq!(outcome.source_url, "http://insecure.example.org/data");
    }

    #[tokio::test]
    async fn test_insecure_option_does_not_trip_scheme_check() {
        let transport = ReqwestTransport::new();

        // The request itself fails (nothing listens on this port), but it
        // must not fail with the Insecure variant.
        let outcome = transport
            .fetch_json(
                "http://127.0.0.1:1/none",
                CallOptions::default().insecure(),
            )
            .await;

        assert!(
            !matches!(outcome.result, Err(TransportError::Insecure { .. })),
            "Insecure option should bypass the scheme check"
        );
    }
}
