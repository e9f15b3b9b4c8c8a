//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error or unreadable response).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The base URL and path did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// The API answered with an error envelope (`message` or `errorMessage`).
    #[error("ERROR: {message}")]
    Upstream { message: String },
    /// The body was not JSON, or not the shape the caller asked for.
    #[error("Malformed response: {0}")]
    Malformed(String),
}
