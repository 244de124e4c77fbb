//! Error types for Agola gateway API operations.

use reqwest::StatusCode;
use thiserror::Error;

use crate::response::RawResponse;

/// Errors that can occur during Agola gateway API operations.
///
/// Variants that carry a [`RawResponse`] were produced after the server
/// answered, so the status and headers can still be inspected through
/// [`AgolaError::response`].
#[derive(Debug, Error)]
pub enum AgolaError {
    /// Configuration is missing or invalid.
    #[error("Agola configuration error: {0}")]
    Config(String),

    /// The request URL could not be built from the base URL and path.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP transport error (DNS, connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    ///
    /// `message` is the response body text, or the status line when the
    /// body is empty or a single byte.
    #[error("{message}")]
    Api {
        message: String,
        response: RawResponse,
    },

    /// A 2xx response body could not be decoded into the target type.
    #[error("Failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        response: RawResponse,
    },

    /// An identifier would not stay a single path segment.
    #[error("Invalid path identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A request payload could not be serialized.
    #[error("Failed to encode request: {0}")]
    Marshal(#[source] serde_json::Error),
}

impl AgolaError {
    /// The server response associated with this error, if one was received.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            AgolaError::Api { response, .. } | AgolaError::Decode { response, .. } => {
                Some(response)
            }
            _ => None,
        }
    }

    /// The HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AgolaError::Http(err) => err.status(),
            _ => self.response().map(RawResponse::status),
        }
    }

    /// Returns true if the transport gave up waiting for the server.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AgolaError::Http(err) if err.is_timeout())
    }
}

/// Result type alias for Agola operations.
pub type Result<T> = core::result::Result<T, AgolaError>;
