use thiserror::Error;

/// Error types for Last.fm API operations.
///
/// This enum covers all possible errors that can occur when talking to the
/// Last.fm web service, including network issues, HTTP failures, remote
/// application errors, authentication failures, and malformed responses.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use lastfm_api::{ClientConfig, LastFm, LastFmError};
///
/// #[tokio::main]
/// async fn main() {
///     let http = http_client::native::NativeClient::new();
///     let client = LastFm::new(
///         Box::new(http),
///         ClientConfig::new("api_key", "api_secret"),
///     );
///
///     match client.authenticate().await {
///         Ok(()) => println!("Session established"),
///         Err(LastFmError::Auth(msg)) => eprintln!("Authentication failed: {}", msg),
///         Err(LastFmError::Api { code, message }) => {
///             eprintln!("Last.fm returned error {}: {}", code, message);
///         }
///         Err(e) => eprintln!("Other error: {}", e),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum LastFmError {
    /// HTTP/network related errors.
    ///
    /// This includes connection failures, timeouts, DNS errors, and other
    /// low-level networking issues. Not retried at this layer.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with a non-success HTTP status.
    #[error("HTTP status {code}: {reason}")]
    Status {
        /// Numeric HTTP status code
        code: u16,
        /// Canonical reason phrase for the status
        reason: String,
    },

    /// Remote application error.
    ///
    /// Last.fm signals failures (invalid parameters, invalid session,
    /// rate limiting, ...) through an `error` field in an otherwise
    /// successful JSON response. The numeric code is the service's own
    /// error code, documented at <https://www.last.fm/api/errorcodes>.
    #[error("Last.fm error {code}: {message}")]
    Api {
        /// Remote numeric error code
        code: i64,
        /// Human-readable message from the service
        message: String,
    },

    /// Authentication failures.
    ///
    /// This occurs when a session key cannot be obtained: bad credentials,
    /// a rejected auth token, or a missing/invalid session key file.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Failed to parse a Last.fm response.
    ///
    /// Returned when the body is not valid JSON or a model cannot be
    /// built from it.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A required key was absent while descending into a response envelope.
    ///
    /// A malformed or unexpectedly-shaped envelope is a defect, not a
    /// recoverable condition, so this propagates loudly.
    #[error("Missing key '{key}' in response")]
    MissingKey {
        /// Dotted path of the key that was not found
        key: String,
    },

    /// Invalid caller input, detected before any network call is made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File system I/O errors.
    ///
    /// This can occur when reading a session key file or persisting
    /// session data.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
