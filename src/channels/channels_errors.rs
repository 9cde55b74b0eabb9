use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Authentication with the channel failed: {0}")]
    AuthenticationFailed(String),
    #[error("Channel unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed channel response: {0}")]
    MalformedResponse(String),
    #[error("Missing channel API credentials")]
    MissingApiData,
    #[error("Unsupported channel: {0}")]
    UnsupportedChannel(String),
    #[error("Unknown channel error: {0}")]
    Unknown(String),
}

impl From<reqwest::Error> for ChannelError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            return ChannelError::Unavailable(e.to_string());
        }
        if e.is_decode() {
            return ChannelError::MalformedResponse(e.to_string());
        }
        if let Some(status) = e.status() {
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return ChannelError::AuthenticationFailed(e.to_string());
            }
        }
        ChannelError::Unknown(e.to_string())
    }
}

impl From<serde_json::Error> for ChannelError {
    fn from(e: serde_json::Error) -> Self {
        ChannelError::MalformedResponse(e.to_string())
    }
}

/// Result type for channel operations
pub type Result<T> = std::result::Result<T, ChannelError>;
