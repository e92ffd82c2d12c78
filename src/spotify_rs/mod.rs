pub mod auth;
pub mod client;
pub mod types;

/// Errors from the Spotify Web API adapter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpotifyApiError {
    #[error("Failed to send http request: {0}")]
    FailedToSendRequest(String),
    #[error("Request timed out")]
    TimedOut,
    #[error("Unexpected status {status}: {reason}")]
    UnexpectedStatus { status: u16, reason: String },
    #[error("Failed to parse response: {0}")]
    FailedToParseResponse(String),
}

impl From<reqwest::Error> for SpotifyApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            SpotifyApiError::TimedOut
        } else if error.is_decode() {
            SpotifyApiError::FailedToParseResponse(error.to_string())
        } else {
            SpotifyApiError::FailedToSendRequest(error.to_string())
        }
    }
}
