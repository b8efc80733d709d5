use lexisium_core::SessionError;
use thiserror::Error;

/// Errors returned by `ApiClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, timeout, or an invalid request
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// The backend rejected the credentials or the bearer token.
    #[error("Invalid credentials or expired session (status {0})")]
    Unauthorized(u16),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Please enter both username and password")]
    MissingCredentials,

    #[error("login succeeded but no token was returned")]
    MissingToken,

    #[error(transparent)]
    Session(#[from] SessionError),
}
