//! Error types for broker operations

/// Result type for broker operations
pub type MessagingResult<T> = std::result::Result<T, MessagingError>;

/// Errors that can occur on the broker side
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Channel could not be opened
    #[error("Failed to open a channel: {0}")]
    ChannelFailed(String),

    /// Exchange or queue declaration failed
    #[error("Failed to declare {object}: {message}")]
    DeclareFailed { object: String, message: String },

    /// Consumer registration failed
    #[error("Failed to register a consumer on {queue}: {message}")]
    ConsumeFailed { queue: String, message: String },

    /// Reply publication failed
    #[error("Failed to publish reply: {0}")]
    PublishFailed(String),

    /// Acknowledge failed
    #[error("Failed to ack delivery: {0}")]
    AckFailed(String),
}
