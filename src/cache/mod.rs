//! Disk cache for API responses
//!
//! A two-layer cache: a raw entry store mapping string keys to JSON files
//! with mtime-based freshness, and a typed façade that (de)serializes
//! values through an injected codec. Freshness windows are supplied per
//! call, in minutes, so different resource types can age differently.

mod store;
mod typed;

pub use store::{Availability, EntryStore, StoreError};
pub use typed::{CacheError, TypedCache};
