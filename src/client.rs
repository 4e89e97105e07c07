//! Cache-first movie metadata client
//!
//! Glues the typed cache to the remote transport: a read goes to the
//! cache first, falls through to the network on a miss or expiry, and
//! stores a successful response back before returning it. Every outcome
//! reaches the caller as an `ApiResponse`.

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::TypedCache;
use crate::codec::{Codec, JsonCodec};
use crate::models::{GenreList, MovieDetails};
use crate::remote::{ApiResponse, CallOptions, Transport};

/// Cache key for the genre catalogue
const GENRES_CACHE_KEY: &str = "genres";

/// Configuration for the movie metadata client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote API
    pub base_url: String,
    /// API key appended to every request
    pub api_key: String,
    /// Per-call timeout
    pub timeout: Duration,
    /// Whether plain-HTTP URLs are rejected
    pub secure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
            secure: true,
        }
    }
}

/// Client for fetching movie metadata with cache-first reads
///
/// Generic over the transport and codec so tests can drive it with a
/// scripted transport and no network. Serve-stale fallback is left to
/// the layer above; `cache()` exposes what such a policy needs.
pub struct MovieClient<T: Transport, C: Codec = JsonCodec> {
    /// Injected transport performing the actual network I/O
    transport: Arc<T>,
    /// Typed disk cache; `None` disables caching entirely
    cache: Option<TypedCache<C>>,
    /// Injected serialization capability
    codec: C,
    /// Endpoint and timeout configuration
    config: ClientConfig,
}

impl<T: Transport> MovieClient<T, JsonCodec> {
    /// Creates a client over the default cache directory
    ///
    /// The cache is disabled when no cache directory can be determined.
    pub fn new(transport: Arc<T>, config: ClientConfig) -> Self {
        Self {
            transport,
            cache: TypedCache::new(),
            codec: JsonCodec,
            config,
        }
    }

    /// Creates a client over a specific typed cache
    pub fn with_cache(transport: Arc<T>, config: ClientConfig, cache: TypedCache) -> Self {
        Self {
            transport,
            cache: Some(cache),
            codec: JsonCodec,
            config,
        }
    }
}

impl<T: Transport, C: Codec> MovieClient<T, C> {
    /// The typed cache, for callers layering their own policies on top
    pub fn cache(&self) -> Option<&TypedCache<C>> {
        self.cache.as_ref()
    }

    /// Fetches a typed resource, serving from cache when fresh
    ///
    /// # Behavior
    /// - A fresh cache entry is returned without touching the network.
    /// - A corrupt cache entry is logged and refetched; the fresh
    ///   response then overwrites the bad entry.
    /// - A successful fetch is stored back through the cache; a store
    ///   failure is logged, not swallowed silently into the response.
    /// - Transport and decode failures come back as `Failure` envelopes.
    pub async fn cached_json<V>(
        &self,
        key: &str,
        url: &str,
        freshness_minutes: i64,
    ) -> ApiResponse<V>
    where
        V: Serialize + DeserializeOwned,
    {
        if let Some(ref cache) = self.cache {
            match cache.load::<V>(key, freshness_minutes) {
                Ok(Some(value)) => {
                    debug!(key, "serving from cache");
                    return ApiResponse::Success(value);
                }
                Ok(None) => {}
                Err(e) => warn!(key, error = %e, "cache read failed; refetching"),
            }
        }

        let outcome = self.transport.fetch_json(url, self.call_options()).await;
        let response = ApiResponse::<V>::from_outcome(outcome, &self.codec);

        if let (ApiResponse::Success(value), Some(cache)) = (&response, self.cache.as_ref()) {
            if let Err(e) = cache.store(key, value) {
                warn!(key, error = %e, "failed to store response in cache");
            }
        }

        response
    }

    /// Fetches the genre catalogue
    pub async fn genres(&self, freshness_minutes: i64) -> ApiResponse<GenreList> {
        let url = format!(
            "{}/genre/movie/list?api_key={}",
            self.config.base_url, self.config.api_key
        );
        self.cached_json(GENRES_CACHE_KEY, &url, freshness_minutes).await
    }

    /// Fetches the detailed record for one movie
    pub async fn movie_details(
        &self,
        movie_id: u64,
        freshness_minutes: i64,
    ) -> ApiResponse<MovieDetails> {
        let key = format!("movie_{}", movie_id);
        let url = format!(
            "{}/movie/{}?api_key={}",
            self.config.base_url, movie_id, self.config.api_key
        );
        self.cached_json(&key, &url, freshness_minutes).await
    }

    /// Call options derived from the client configuration
    fn call_options(&self) -> CallOptions {
        let mut options = CallOptions::default().timeout(self.config.timeout);
        if !self.config.secure {
            options = options.insecure();
        }
        options
    }
}
