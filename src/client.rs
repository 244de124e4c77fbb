//! Agola gateway API client.
//!
//! Low-level HTTP pipeline: builds authenticated requests under the
//! versioned API prefix, classifies responses by status and decodes JSON
//! bodies. Resource operations live next to their models and are thin
//! compositions over [`AgolaClient::execute`] and
//! [`AgolaClient::execute_empty`].

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::{AgolaError, Result};
use crate::request::{overlay_headers, ApiRequest, QueryParams};
use crate::response::{ApiResponse, RawResponse};
use crate::transport::Transport;

const DEFAULT_GATEWAY_URL: &str = "http://localhost:8000";
const USER_AGENT: &str = concat!("agolapi/", env!("CARGO_PKG_VERSION"));

/// Path prefix of every gateway API endpoint.
pub const API_PREFIX: &str = "/api/v1alpha";

/// Low-level Agola gateway client.
///
/// Holds the base URL, the API token and the transport. It carries no
/// per-call state, so a single client can serve concurrent calls.
///
/// This struct is cheaply cloneable; clones share the same transport.
///
/// # Example
///
/// ```no_run
/// use agolapi::AgolaClient;
///
/// # fn example() -> agolapi::Result<()> {
/// // Create from environment variables
/// let client = AgolaClient::from_env()?;
///
/// // Or configure manually
/// let client = AgolaClient::new("https://agola.example.com", "your-token")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AgolaClient {
    transport: Arc<dyn Transport>,
    base_url: Arc<str>,
    authorization: HeaderValue,
}

impl std::fmt::Debug for AgolaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgolaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AgolaClient {
    /// Create a client from environment variables.
    ///
    /// Uses `AGOLA_TOKEN` for authentication and optionally
    /// `AGOLA_GATEWAY_URL` for the base URL (defaults to
    /// `http://localhost:8000`).
    ///
    /// # Errors
    ///
    /// Returns an error if `AGOLA_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("AGOLA_TOKEN").map_err(|_| {
            AgolaError::Config("AGOLA_TOKEN environment variable not set".to_string())
        })?;

        let base_url =
            env::var("AGOLA_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string());

        Self::new(&base_url, &token)
    }

    /// Create a new client with the default transport.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Gateway URL (e.g., `https://agola.example.com`); a
    ///   trailing slash is removed
    /// * `token` - API token, sent as `Authorization: token <token>`
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the
    /// HTTP client cannot be built. The base URL is only parsed when a
    /// request is made.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(AgolaError::Http)?;

        Self::with_parts(base_url, token, Arc::new(http))
    }

    fn with_parts(base_url: &str, token: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("token {token}"))
            .map_err(|err| AgolaError::Config(format!("invalid api token: {err}")))?;
        authorization.set_sensitive(true);

        Ok(Self {
            transport,
            base_url: Arc::from(base_url.strip_suffix('/').unwrap_or(base_url)),
            authorization,
        })
    }

    /// Replace the transport, consuming and returning the client.
    pub fn with_transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.set_transport(transport);
        self
    }

    /// Replace the transport used for subsequent calls.
    pub fn set_transport<T: Transport + 'static>(&mut self, transport: T) {
        self.transport = Arc::new(transport);
    }

    /// Get the base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the absolute URL for an API `path` and its query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AgolaError::Url`] if the base URL is malformed.
    pub fn endpoint_url(&self, path: &str, query: &QueryParams) -> Result<Url> {
        let separator = if path.starts_with('/') { "" } else { "/" };
        let mut url = Url::parse(&format!(
            "{}{API_PREFIX}{separator}{path}",
            self.base_url
        ))?;

        let encoded = query.encode();
        if !encoded.is_empty() {
            trace!(query = %encoded, "encoded query");
            url.set_query(Some(&encoded));
        }
        Ok(url)
    }

    /// Turn a request descriptor into a transport request.
    ///
    /// The token header is set first; caller headers are overlaid on top,
    /// so an explicit caller `Authorization` header wins.
    fn build_request(&self, request: ApiRequest) -> Result<reqwest::Request> {
        let (method, path, query, headers, body) = request.into_parts();
        let url = self.endpoint_url(&path, &query)?;

        let mut req = reqwest::Request::new(method, url);
        req.headers_mut()
            .insert(AUTHORIZATION, self.authorization.clone());
        overlay_headers(req.headers_mut(), &headers);
        if let Some(body) = body {
            *req.body_mut() = Some(body.into());
        }
        Ok(req)
    }

    /// Send a request and return the response regardless of its status.
    async fn send(&self, request: ApiRequest) -> Result<reqwest::Response> {
        let req = self.build_request(request)?;
        debug!(method = %req.method(), url = %req.url(), "sending request");
        self.transport.execute(req).await
    }

    /// Send a request and fail on any non-2xx status.
    ///
    /// On failure the body is drained and turned into the error message.
    async fn get_response(&self, request: ApiRequest) -> Result<reqwest::Response> {
        let response = self.send(request).await?;
        let status = response.status();
        debug!(%status, "received response");

        if status.is_success() {
            return Ok(response);
        }

        let raw = RawResponse::from_response(&response);
        let body = drain_body(response).await?;
        Err(status_error(body, raw))
    }

    /// Execute a request and decode its JSON body into `T`.
    ///
    /// # Errors
    ///
    /// - [`AgolaError::Url`] if the URL cannot be built (no I/O is done)
    /// - [`AgolaError::Http`] on transport failure
    /// - [`AgolaError::Api`] on a non-2xx status
    /// - [`AgolaError::Decode`] if the body is not valid JSON for `T`
    #[tracing::instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<ApiResponse<T>> {
        let response = self.get_response(request).await?;
        let raw = RawResponse::from_response(&response);
        let body = drain_body(response).await?;
        let data = decode(&body, &raw)?;
        Ok(ApiResponse {
            data,
            response: raw,
        })
    }

    /// Execute a request whose response body carries no result.
    ///
    /// The body is still read to completion so the connection can be reused.
    ///
    /// # Errors
    ///
    /// Same as [`AgolaClient::execute`], minus decoding.
    #[tracing::instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn execute_empty(&self, request: ApiRequest) -> Result<RawResponse> {
        let response = self.get_response(request).await?;
        let raw = RawResponse::from_response(&response);
        drain_body(response).await?;
        Ok(raw)
    }
}

/// Read the whole response body, releasing the connection.
async fn drain_body(mut response: reqwest::Response) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Build the error for a non-2xx response.
///
/// Bodies of zero or one byte (typically a bare newline) carry no message,
/// so the status line is used instead.
fn status_error(body: Vec<u8>, response: RawResponse) -> AgolaError {
    let message = if body.len() <= 1 {
        response.status_line()
    } else {
        String::from_utf8_lossy(&body).into_owned()
    };
    AgolaError::Api { message, response }
}

/// Decode the first JSON value of `body`; trailing data is ignored.
fn decode<T: DeserializeOwned>(body: &[u8], response: &RawResponse) -> Result<T> {
    let to_error = |source| AgolaError::Decode {
        source,
        response: response.clone(),
    };

    match serde_json::Deserializer::from_slice(body).into_iter::<T>().next() {
        Some(result) => result.map_err(to_error),
        // Empty body: let serde report the EOF.
        None => serde_json::from_slice(body).map_err(to_error),
    }
}
