//! Asynchronous single-shot search flow
//!
//! Each dispatched query issues exactly one network fetch and announces
//! exactly one typed notification to all current subscribers. Dispatches
//! are independent: a newer request neither cancels nor waits for an
//! older one, and completions may arrive out of order, so every
//! notification carries its own query.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::codec::{Codec, JsonCodec};
use crate::models::SearchPage;
use crate::remote::{CallOptions, Transport};

/// Capacity of the notification channel
const CHANNEL_CAPACITY: usize = 32;

/// A search query for movie titles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Title text to search for
    pub title: String,
    /// Optional release year narrowing the search
    pub year: Option<u16>,
}

impl SearchQuery {
    /// Creates a query for a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
        }
    }

    /// Narrows the query to a release year
    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }
}

/// Configuration for the search flow
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL of the remote API
    pub base_url: String,
    /// API key appended to every request
    pub api_key: String,
    /// Per-call timeout
    pub timeout: Duration,
    /// Whether a malformed body on a successful call announces a failure
    /// notification; `false` drops it silently instead
    pub announce_malformed: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
            announce_malformed: true,
        }
    }
}

/// Notification announced to subscribers when a search completes
#[derive(Debug, Clone)]
pub enum SearchNotification {
    /// The search succeeded and its results parsed
    Completed {
        /// Query the results belong to
        query: SearchQuery,
        /// Parsed result page
        page: SearchPage,
    },
    /// The search failed in transport or parsing
    Failed {
        /// Query the failure belongs to
        query: SearchQuery,
        /// Human-readable failure description
        reason: String,
    },
}

/// Issues single-shot search requests and broadcasts their outcomes
pub struct SearchFlow<T: Transport, C: Codec = JsonCodec> {
    /// Injected transport performing the actual network I/O
    transport: Arc<T>,
    /// Injected serialization capability
    codec: C,
    /// Endpoint and behavior configuration
    config: SearchConfig,
    /// Fan-out channel to current subscribers
    notify: broadcast::Sender<SearchNotification>,
    /// Number of fetches currently in flight
    in_flight: Arc<AtomicUsize>,
}

impl<T: Transport + 'static> SearchFlow<T, JsonCodec> {
    /// Creates a search flow with the default JSON codec
    pub fn new(transport: Arc<T>, config: SearchConfig) -> Self {
        Self::with_codec(transport, config, JsonCodec)
    }
}

impl<T, C> SearchFlow<T, C>
where
    T: Transport + 'static,
    C: Codec + Clone + 'static,
{
    /// Creates a search flow with an injected codec
    pub fn with_codec(transport: Arc<T>, config: SearchConfig, codec: C) -> Self {
        let (notify, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            transport,
            codec,
            config,
            notify,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Registers a subscriber for completion notifications
    ///
    /// Publication is fire-and-forget: a flow with no subscribers still
    /// runs its fetches and simply drops the announcements.
    pub fn subscribe(&self) -> broadcast::Receiver<SearchNotification> {
        self.notify.subscribe()
    }

    /// Number of fetches currently in flight
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Builds the request URL for a query
    pub fn search_url(&self, query: &SearchQuery) -> String {
        let mut url = format!(
            "{}/search/movie?api_key={}&query={}",
            self.config.base_url,
            self.config.api_key,
            urlencoding::encode(&query.title)
        );
        if let Some(year) = query.year {
            url.push_str(&format!("&year={}", year));
        }
        url
    }

    /// Issues one fetch for the query and announces its outcome
    ///
    /// Returns the handle of the spawned task so completion is
    /// observable; dropping the handle does not cancel the fetch.
    /// Dispatching again while a fetch is in flight starts an
    /// independent fetch.
    pub fn dispatch(&self, query: SearchQuery) -> JoinHandle<()> {
        let url = self.search_url(&query);
        let transport = Arc::clone(&self.transport);
        let codec = self.codec.clone();
        let notify = self.notify.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let announce_malformed = self.config.announce_malformed;
        let options = CallOptions::default().timeout(self.config.timeout);

        in_flight.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            let outcome = transport.fetch_json(&url, options).await;

            let notification = match outcome.result {
                Ok(body) => match codec.decode::<SearchPage>(&body) {
                    Ok(page) => Some(SearchNotification::Completed { query, page }),
                    Err(e) => {
                        if announce_malformed {
                            Some(SearchNotification::Failed {
                                query,
                                reason: format!("malformed search response: {}", e),
                            })
                        } else {
                            debug!(url = %url, "dropping malformed search response");
                            None
                        }
                    }
                },
                Err(error) => Some(SearchNotification::Failed {
                    query,
                    reason: error.to_string(),
                }),
            };

            if let Some(notification) = notification {
                // Fire-and-forget: no subscribers is fine
                let _ = notify.send(notification);
            }

            in_flight.fetch_sub(1, Ordering::SeqCst);
        })
    }
}
