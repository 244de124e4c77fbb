//! Transport seam between the client and the network.

use async_trait::async_trait;
use reqwest::{Request, Response};

use crate::error::{AgolaError, Result};

/// Sends fully built requests.
///
/// [`AgolaClient`](crate::AgolaClient) builds every request itself and hands
/// it to a `Transport`, so callers can wrap or replace the network layer
/// (proxies, custom TLS, recording) without touching the request pipeline.
/// Any [`reqwest::Client`] is a transport.
///
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the response once its headers arrive.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be delivered or the
    /// response headers could not be read.
    async fn execute(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn execute(&self, request: Request) -> Result<Response> {
        reqwest::Client::execute(self, request)
            .await
            .map_err(AgolaError::Http)
    }
}
