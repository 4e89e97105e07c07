//! Typed cache façade
//!
//! Generic load/store/clear operations layered over the raw entry store,
//! converting values through an injected codec. Cache misses and expiry
//! are plain `Ok(None)` results; a payload that exists but cannot be
//! decoded is an explicit error so callers can tell "no data" from
//! "bad data".

use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::cache::store::{Availability, EntryStore, StoreError};
use crate::codec::{Codec, CodecError, JsonCodec};

/// Errors that can occur when using the typed cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// An entry exists but its payload could not be decoded
    #[error("cache entry for \"{key}\" could not be decoded: {source}")]
    Corrupt {
        /// Key of the unreadable entry
        key: String,
        #[source]
        source: CodecError,
    },

    /// The value could not be encoded for storage
    #[error("value for \"{key}\" could not be encoded: {source}")]
    Encode {
        /// Key the value was meant to be stored under
        key: String,
        #[source]
        source: CodecError,
    },

    /// Underlying entry store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Typed view over the entry store
///
/// The freshness window is supplied per call rather than fixed per key,
/// since different resource types tolerate different staleness.
#[derive(Debug, Clone)]
pub struct TypedCache<C: Codec = JsonCodec> {
    /// Raw key/payload storage
    entries: EntryStore,
    /// Injected serialization capability
    codec: C,
}

impl TypedCache<JsonCodec> {
    /// Creates a typed cache over the default XDG cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined.
    pub fn new() -> Option<Self> {
        Some(Self {
            entries: EntryStore::new()?,
            codec: JsonCodec,
        })
    }

    /// Creates a typed cache over a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self {
            entries: EntryStore::with_dir(cache_dir),
            codec: JsonCodec,
        }
    }
}

impl<C: Codec> TypedCache<C> {
    /// Creates a typed cache over an existing entry store and codec
    pub fn with_store(entries: EntryStore, codec: C) -> Self {
        Self { entries, codec }
    }

    /// Checks whether an entry exists and whether it is still fresh
    ///
    /// Lets callers distinguish "never cached" from "cached but stale"
    /// without loading the payload.
    pub fn availability(&self, key: &str, freshness_minutes: i64) -> Result<Availability, CacheError> {
        Ok(self.entries.availability(key, freshness_minutes)?)
    }

    /// Loads a typed value if a fresh entry exists
    ///
    /// # Returns
    /// * `Ok(Some(value))` - a fresh entry existed and decoded cleanly
    /// * `Ok(None)` - no entry, or the entry is past the freshness window
    /// * `Err(CacheError::Corrupt)` - an entry existed but failed to decode
    /// * `Err(CacheError::Store)` - filesystem failure other than not-found
    pub fn load<T: DeserializeOwned>(
        &self,
        key: &str,
        freshness_minutes: i64,
    ) -> Result<Option<T>, CacheError> {
        let availability = self.entries.availability(key, freshness_minutes)?;
        if !availability.is_fresh() {
            debug!(key, available = availability.available, "cache miss");
            return Ok(None);
        }

        self.decode_entry(key)
    }

    /// Loads a typed value regardless of the freshness window
    ///
    /// Supports serve-stale fallback policies in the layer above: after a
    /// failed remote fetch, a caller may still read the expired entry.
    pub fn load_stale<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let availability = self.entries.availability(key, 0)?;
        if !availability.available {
            return Ok(None);
        }

        self.decode_entry(key)
    }

    /// Serializes a value and writes it under the key
    ///
    /// Unconditionally replaces any prior entry. The result is explicit:
    /// a failed store is reported, never silently dropped, and a
    /// subsequent `load` on the same key observes the stored value.
    pub fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let payload = self.codec.encode(value).map_err(|source| CacheError::Encode {
            key: key.to_string(),
            source,
        })?;

        self.entries.write_raw(key, &payload)?;
        Ok(())
    }

    /// Deletes the entry for a key if one exists
    ///
    /// Checks existence first (minimal freshness window) and returns
    /// `Ok(false)` for a never-stored key.
    pub fn clear(&self, key: &str) -> Result<bool, CacheError> {
        let availability = self.entries.availability(key, 0)?;
        if !availability.available {
            return Ok(false);
        }

        Ok(self.entries.delete(key)?)
    }

    /// Reads and decodes the entry for a key
    fn decode_entry<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let payload = match self.entries.read_raw(key) {
            Ok(payload) => payload,
            // Entry vanished between the availability check and the read
            Err(StoreError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let value = self.codec.decode(&payload).map_err(|source| CacheError::Corrupt {
            key: key.to_string(),
            source,
        })?;

        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    /// Codec that refuses to encode anything
    #[derive(Debug, Clone, Copy)]
    struct FailingCodec;

    impl Codec for FailingCodec {
        fn encode<T: Serialize>(&self, _value: &T) -> Result<String, CodecError> {
            Err(CodecError("encoder disabled".to_string()))
        }

        fn decode<T: DeserializeOwned>(&self, _text: &str) -> Result<T, CodecError> {
            Err(CodecError("decoder disabled".to_string()))
        }
    }

    fn create_test_cache() -> (TypedCache, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = TypedCache::with_dir(temp_dir.path().to_path_buf());
        (cache, temp_dir)
    }

    #[test]
    fn test_store_then_load_roundtrip() {
        let (cache, _temp_dir) = create_test_cache();
        let data = TestData {
            name: "roundtrip".to_string(),
            value: 42,
        };

        cache.store("roundtrip_key", &data).expect("Store should succeed");

        let loaded: Option<TestData> = cache
            .load("roundtrip_key", 60)
            .expect("Load should succeed");
        assert_eq!(loaded, Some(data), "Load should observe the stored value");
    }

    #[test]
    fn test_load_never_stored_key_is_none() {
        let (cache, _temp_dir) = create_test_cache();

        let loaded: Option<TestData> = cache.load("missing", 60).expect("Load should not fail");

        assert!(loaded.is_none(), "Never-stored key should load as None");
    }

    #[test]
    fn test_store_overwrites_prior_entry() {
        let (cache, _temp_dir) = create_test_cache();
        let first = TestData {
            name: "first".to_string(),
            value: 1,
        };
        let second = TestData {
            name: "second".to_string(),
            value: 2,
        };

        cache.store("overwrite", &first).expect("First store should succeed");
        cache.store("overwrite", &second).expect("Second store should succeed");

        let loaded: Option<TestData> = cache.load("overwrite", 60).expect("Load should succeed");
        assert_eq!(loaded, Some(second), "Load should observe the latest store");
    }

    #[test]
    fn test_corrupt_entry_surfaces_explicit_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let entries = EntryStore::with_dir(temp_dir.path().to_path_buf());
        entries
            .write_raw("corrupt", "{definitely not json")
            .expect("Raw write should succeed");

        let cache = TypedCache::with_store(entries, JsonCodec);
        let result: Result<Option<TestData>, CacheError> = cache.load("corrupt", 60);

        assert!(
            matches!(result, Err(CacheError::Corrupt { ref key, .. }) if key == "corrupt"),
            "Corrupt payload must not be a silent None: {:?}",
            result
        );
    }

    #[test]
    fn test_encode_failure_is_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let entries = EntryStore::with_dir(temp_dir.path().to_path_buf());
        let cache = TypedCache::with_store(entries, FailingCodec);

        let data = TestData {
            name: "unstorable".to_string(),
            value: 0,
        };
        let result = cache.store("unstorable", &data);

        assert!(
            matches!(result, Err(CacheError::Encode { .. })),
            "Store failure should be observable, got {:?}",
            result
        );
    }

    #[test]
    fn test_clear_after_store_makes_key_unavailable() {
        let (cache, _temp_dir) = create_test_cache();
        let data = TestData {
            name: "cleared".to_string(),
            value: 7,
        };

        cache.store("cleared", &data).expect("Store should succeed");
        let removed = cache.clear("cleared").expect("Clear should succeed");

        assert!(removed, "Clear should report the entry was removed");
        let availability = cache.availability("cleared", 60).expect("Check should succeed");
        assert!(!availability.available, "Cleared key should be unavailable");
    }

    #[test]
    fn test_clear_never_stored_key_is_noop() {
        let (cache, _temp_dir) = create_test_cache();

        let removed = cache.clear("never_stored").expect("Clear should not fail");

        assert!(!removed, "Clearing a never-stored key should report false");
    }

    #[test]
    fn test_load_stale_ignores_freshness_window() {
        let (cache, _temp_dir) = create_test_cache();
        let data = TestData {
            name: "stale".to_string(),
            value: 9,
        };

        cache.store("stale", &data).expect("Store should succeed");

        // A fresh entry is also loadable through the stale path
        let loaded: Option<TestData> = cache.load_stale("stale").expect("Load should succeed");
        assert_eq!(loaded, Some(data));

        let missing: Option<TestData> = cache.load_stale("missing").expect("Load should not fail");
        assert!(missing.is_none());
    }
}
