//! Cinedata
//!
//! Client library for a remote movie-metadata JSON API: a key-based,
//! time-expiring disk cache, a transport-agnostic remote call
//! abstraction with typed result envelopes, and a broadcast-based
//! single-shot search flow.

pub mod cache;
pub mod client;
pub mod codec;
pub mod models;
pub mod remote;
pub mod search;
