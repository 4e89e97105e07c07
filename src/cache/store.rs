//! Raw cache entry store
//!
//! Maps a string key to one JSON file on disk named by a fixed template,
//! with freshness derived from the file's modification time. Missing
//! entries are a normal outcome, not an error; only real filesystem
//! failures (permissions, disk full) surface as errors.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Prefix of every cache entry file name
const ENTRY_PREFIX: &str = "Cache_";

/// Suffix of every cache entry file name
const ENTRY_SUFFIX: &str = "_Data.json";

/// Errors that can occur when accessing the entry store
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entry exists for the requested key
    #[error("no cache entry for key \"{0}\"")]
    NotFound(String),

    /// Underlying filesystem failure other than not-found
    #[error("cache storage failed: {0}")]
    Io(#[from] io::Error),
}

/// Result of checking a key against a freshness window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    /// Whether an entry exists for the key
    pub available: bool,
    /// Whether the entry is older than the freshness window
    pub expired: bool,
}

impl Availability {
    /// An entry that was not found; never expired
    pub const ABSENT: Availability = Availability {
        available: false,
        expired: false,
    };

    /// True when the entry exists and is within the freshness window
    pub fn is_fresh(&self) -> bool {
        self.available && !self.expired
    }
}

/// Stores one JSON payload per key on durable storage
///
/// Entry files live in a single cache directory and are named
/// `Cache_<key>_Data.json`, so the key-to-location mapping is a pure
/// function of the key. Writes replace the entry atomically by writing
/// to a temporary sibling and renaming over the target.
#[derive(Debug, Clone)]
pub struct EntryStore {
    /// Directory where entry files are stored
    cache_dir: PathBuf,
}

impl EntryStore {
    /// Creates a new EntryStore using the XDG-compliant cache directory
    ///
    /// Uses `~/.cache/cinedata/` on Linux, or the equivalent path on other
    /// platforms. Returns `None` if the cache directory cannot be
    /// determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "cinedata")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new EntryStore with a custom cache directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path to the entry file for the given key
    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}{}{}", ENTRY_PREFIX, sanitize_key(key), ENTRY_SUFFIX))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Checks whether an entry exists and whether it is still fresh
    ///
    /// # Arguments
    /// * `key` - The cache key to check
    /// * `freshness_minutes` - Maximum age in whole minutes before an
    ///   entry counts as expired
    ///
    /// # Returns
    /// * `Ok(Availability)` - `available = false` when no entry exists;
    ///   otherwise `expired` reflects the elapsed minutes since the last
    ///   write, strictly compared against the window
    /// * `Err(StoreError::Io)` - on filesystem failures other than not-found
    pub fn availability(&self, key: &str, freshness_minutes: i64) -> Result<Availability, StoreError> {
        let path = self.entry_path(key);

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Availability::ABSENT),
            Err(e) => return Err(e.into()),
        };

        let modified: DateTime<Utc> = metadata.modified()?.into();
        let elapsed_minutes = Utc::now().signed_duration_since(modified).num_minutes();
        let expired = elapsed_minutes > freshness_minutes;

        debug!(key, elapsed_minutes, freshness_minutes, expired, "cache availability check");

        Ok(Availability {
            available: true,
            expired,
        })
    }

    /// Reads the stored payload for a key
    ///
    /// Returns `StoreError::NotFound` when no entry exists; callers that
    /// checked availability first will only see this under a concurrent
    /// delete.
    pub fn read_raw(&self, key: &str) -> Result<String, StoreError> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Creates or replaces the entry for a key
    ///
    /// The payload is written to a temporary sibling file and renamed over
    /// the target, so a concurrent reader never observes a partial write.
    pub fn write_raw(&self, key: &str, payload: &str) -> Result<(), StoreError> {
        self.ensure_dir()?;

        let path = self.entry_path(key);
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, payload)?;
        fs::rename(&tmp_path, &path)?;

        debug!(key, bytes = payload.len(), "cache entry written");
        Ok(())
    }

    /// Removes the entry for a key if present
    ///
    /// Returns `Ok(true)` when an entry was removed and `Ok(false)` when
    /// no entry existed; a missing entry is a no-op, not an error.
    pub fn delete(&self, key: &str) -> Result<bool, StoreError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => {
                debug!(key, "cache entry deleted");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Maps a caller-chosen key to a filesystem-safe form
///
/// Bytes outside `[A-Za-z0-9._-]` are replaced with underscores; the
/// mapping is deterministic so a key always resolves to the same file.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
