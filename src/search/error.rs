//! Error types for search backend operations

/// Result type for search backend operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur talking to the search backend
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Request could not be sent
    #[error("cannot send request to search backend: {0}")]
    Transport(String),

    /// Backend answered with a status outside the tolerated window
    #[error("search backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Backend response could not be decoded
    #[error("cannot decode search backend response: {0}")]
    Decode(String),

    /// Request body could not be encoded
    #[error("cannot encode request body: {0}")]
    Encode(String),

    /// Lazy index creation failed
    #[error("cannot create index {index}: {source}")]
    CreateIndex {
        index: String,
        #[source]
        source: Box<SearchError>,
    },

    /// A hit carried a non-numeric document id
    #[error("hit id is not a valid log id: {0}")]
    InvalidHitId(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Encode(err.to_string())
    }
}
