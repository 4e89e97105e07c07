//! Transport capability for remote API calls
//!
//! Defines the contract a concrete HTTP transport must satisfy: JSON
//! fetches with or without a request body, binary fetches, and file
//! downloads, each parameterized by a cache-level hint, an optional
//! timeout and a TLS flag. Every call resolves to a `FetchOutcome` that
//! retains the source URL whether the call succeeded or failed.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// HTTP method for a remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Transport-level cache directive
///
/// A closed hint consumed by the transport, governing HTTP-level caching
/// of the raw network call. Distinct from the application's typed disk
/// cache: the transport decides how, or whether, to honor each value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheLevel {
    /// Transport decides using normal HTTP caching heuristics
    #[default]
    Default,
    /// Always hit the network; read and write no intermediate cache
    BypassCache,
    /// Serve only from cache; a missing entry is a cache-miss error
    CacheOnly,
    /// Prefer cache, fall back to the network
    CacheIfAvailable,
    /// Conditional fetch; use cache only if the server confirms unchanged
    Revalidate,
    /// Force a network fetch but permit caching the result
    Reload,
    /// Never read or write cache, and drop any existing cached copy
    NoCacheNoStore,
}

/// Per-call options for a remote call
#[derive(Debug, Clone)]
pub struct CallOptions {
    /// Override of the per-operation default method
    pub method: Option<HttpMethod>,
    /// Cache directive passed to the transport
    pub cache_level: CacheLevel,
    /// Maximum time to wait before the call fails with a timeout
    pub timeout: Option<Duration>,
    /// Whether plain-HTTP URLs are rejected
    pub secure: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            method: None,
            cache_level: CacheLevel::Default,
            timeout: None,
            secure: true,
        }
    }
}

impl CallOptions {
    /// Sets an explicit HTTP method
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the cache directive
    pub fn cache_level(mut self, cache_level: CacheLevel) -> Self {
        self.cache_level = cache_level;
        self
    }

    /// Sets a per-call timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Permits plain-HTTP URLs
    pub fn insecure(mut self) -> Self {
        self.secure = false;
        self
    }
}

/// Errors a transport can report
///
/// Variants carry plain strings rather than source error types so the
/// error stays `Clone` and can travel through notification channels.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Connection, DNS or protocol failure
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// The per-call timeout elapsed before a response arrived
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: u16,
        /// Response body, kept for structured-status parsing upstream
        body: Option<String>,
    },

    /// `CacheOnly` was requested and no cached response exists
    #[error("no cached response available for {url}")]
    CacheMiss { url: String },

    /// A plain-HTTP URL was rejected under `secure`
    #[error("refusing insecure URL {url}")]
    Insecure { url: String },

    /// Writing a downloaded resource to disk failed
    #[error("failed to store download from {url}: {message}")]
    Io { url: String, message: String },
}

impl TransportError {
    /// HTTP status code, for status-bearing failures
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body of a status-bearing failure, if one was captured
    pub fn body(&self) -> Option<&str> {
        match self {
            TransportError::Status { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

/// Uniform result of one remote call
///
/// The source URL is retained for diagnostics regardless of outcome.
#[derive(Debug, Clone)]
pub struct FetchOutcome<P> {
    /// URL the call was issued against
    pub source_url: String,
    /// Payload on success, structured error on any failure
    pub result: Result<P, TransportError>,
}

impl<P> FetchOutcome<P> {
    /// Wraps a successful call
    pub fn success(source_url: impl Into<String>, payload: P) -> Self {
        Self {
            source_url: source_url.into(),
            result: Ok(payload),
        }
    }

    /// Wraps a failed call
    pub fn failure(source_url: impl Into<String>, error: TransportError) -> Self {
        Self {
            source_url: source_url.into(),
            result: Err(error),
        }
    }

    /// True when the call produced a payload
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The payload, if the call succeeded
    pub fn payload(&self) -> Option<&P> {
        self.result.as_ref().ok()
    }
}

/// Capability for issuing calls against a remote JSON API
///
/// Polymorphic over transport implementations; callers never see the
/// underlying HTTP client. Every operation resolves rather than raises:
/// network failures, timeouts and non-success statuses all come back as
/// a `FetchOutcome` carrying a `TransportError`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches a JSON document; defaults to GET
    async fn fetch_json(&self, url: &str, options: CallOptions) -> FetchOutcome<String>;

    /// Fetches a JSON document with a request body; defaults to POST
    async fn fetch_json_with_body(
        &self,
        url: &str,
        body: &str,
        options: CallOptions,
    ) -> FetchOutcome<String>;

    /// Downloads a binary resource to a named file, returning its path
    async fn download_to_file(
        &self,
        url: &str,
        destination_name: &str,
        options: CallOptions,
    ) -> FetchOutcome<PathBuf>;

    /// Fetches a binary resource into memory
    async fn fetch_bytes(&self, url: &str, options: CallOptions) -> FetchOutcome<Vec<u8>>;
}
