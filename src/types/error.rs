use thiserror::Error;

/// Errors that can occur when using the realtime channel client.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// WebSocket protocol error (handshake failed, invalid frame, etc.)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// General transport error with descriptive message
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing error (malformed endpoint URL)
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Endpoint URL is well-formed but not usable for this transport
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Convenience type alias for `Result<T, ChannelError>`.
pub type Result<T> = std::result::Result<T, ChannelError>;
