//! Response envelope types.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

/// Status and headers of a completed gateway response.
///
/// The body has already been consumed by the time a `RawResponse` is
/// handed out; it is kept around so callers can inspect the status even
/// when an error is returned.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    reason: Option<String>,
    headers: HeaderMap,
}

impl RawResponse {
    /// Create a response envelope from a status and header set.
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            status,
            reason: None,
            headers,
        }
    }

    /// Attach the reason phrase the server sent with the status.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub(crate) fn from_response(response: &reqwest::Response) -> Self {
        let raw = Self::new(response.status(), response.headers().clone());
        // hyper only records the phrase when it differs from the canonical one
        match response.extensions().get::<hyper::ext::ReasonPhrase>() {
            Some(reason) => raw.with_reason(String::from_utf8_lossy(reason.as_bytes())),
            None => raw,
        }
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The status line as sent by the server, e.g. `404 Not Found`.
    ///
    /// Falls back to the canonical reason, or the bare code when the status
    /// has none.
    pub fn status_line(&self) -> String {
        let code = self.status.as_str();
        match self.reason.as_deref().or(self.status.canonical_reason()) {
            Some(reason) => format!("{code} {reason}"),
            None => code.to_string(),
        }
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// A decoded response body together with its envelope.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// The decoded body.
    pub data: T,
    /// Status and headers of the response.
    pub response: RawResponse,
}

impl<T> ApiResponse<T> {
    /// Discard the envelope and keep the decoded body.
    pub fn into_data(self) -> T {
        self.data
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// Map the decoded body to a different type.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResponse<U> {
        ApiResponse {
            data: f(self.data),
            response: self.response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_uses_canonical_reason() {
        let raw = RawResponse::new(StatusCode::NOT_FOUND, HeaderMap::new());
        assert_eq!(raw.status_line(), "404 Not Found");
    }

    #[test]
    fn test_status_line_keeps_server_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        let raw = RawResponse::new(status, HeaderMap::new());
        assert_eq!(raw.status_line(), "599");

        let raw = raw.with_reason("Custom");
        assert_eq!(raw.status_line(), "599 Custom");

        let raw =
            RawResponse::new(StatusCode::NOT_FOUND, HeaderMap::new()).with_reason("Gone Fishing");
        assert_eq!(raw.status_line(), "404 Gone Fishing");
    }
}
