//! Retrieval-and-classification engine on top of the search backend.
//!
//! The backend is an external inverted-index service speaking JSON
//! bulk and search requests. This module owns the document schema, the
//! query shape the service emits, the hit shape it consumes, and the
//! deterministic score aggregation layered on top.

pub mod client;
pub mod document;
pub mod error;
pub mod query;
pub mod response;
pub mod scoring;

pub use client::EsClient;
pub use error::{SearchError, SearchResult};

/// Integer representation of the ERROR logging level. Only logs at
/// this level or above are indexed, and queries filter on it too.
pub const ERROR_LOG_LEVEL: i32 = 40000;
