//! Remote call abstraction
//!
//! The transport capability trait and its reqwest implementation, plus
//! the typed envelope that turns raw fetch outcomes into parsed domain
//! values or structured errors.

mod envelope;
mod http;
mod transport;

pub use envelope::{ApiError, ApiResponse, ApiStatus};
pub use http::ReqwestTransport;
pub use transport::{CacheLevel, CallOptions, FetchOutcome, HttpMethod, Transport, TransportError};
