//! JSON conversion capability
//!
//! Serialization is injected as a capability rather than called as an
//! ambient utility, so the cache and envelope layers can be tested with
//! deterministic or deliberately failing codecs.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Error produced when encoding or decoding a value fails
///
/// Carries the underlying message as a plain string so that types built
/// on top of it (notifications, envelopes) remain `Clone`.
#[derive(Debug, Clone, Error)]
#[error("JSON conversion failed: {0}")]
pub struct CodecError(pub String);

/// Capability for converting values to and from their serialized text form
pub trait Codec: Send + Sync {
    /// Serializes a value to its text representation
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, CodecError>;

    /// Deserializes a value from its text representation
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError>;
}

/// Default codec backed by serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, CodecError> {
        serde_json::to_string(value).map_err(|e| CodecError(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError> {
        serde_json::from_str(text).map_err(|e| CodecError(e.to_string()))
    }
}
