//! Log-analysis service for a test-results platform.
//!
//! Indexes failed-test log messages into a per-project inverted index
//! (an Elasticsearch-compatible HTTP backend) and predicts defect
//! categories for unclassified failures by retrieving similar,
//! already-classified messages and aggregating their scores.
//!
//! Five RPC operations are served from an AMQP direct exchange
//! (`index`, `analyze`, `delete`, `clean`, `search`); the same handlers
//! are also exposed over an HTTP gateway.

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod messaging;
pub mod models;
pub mod sanitize;
pub mod search;
