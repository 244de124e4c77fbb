//! Remote source models and operations.
//!
//! A remote source is a git hosting service (gitea, gitlab, github) that
//! Agola reads repositories from and authenticates users against.

use serde::{Deserialize, Serialize};

use crate::client::AgolaClient;
use crate::error::Result;
use crate::pagination::ListOptions;
use crate::request::{escape_segment, join_path, ApiRequest};
use crate::response::{ApiResponse, RawResponse};

/// A full remote source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSource {
    pub id: String,
    pub name: String,

    /// Hosting service type (e.g., "gitea", "gitlab", "github").
    #[serde(rename = "type", default)]
    pub source_type: Option<String>,

    /// Authentication type ("oauth2" or "password").
    #[serde(default)]
    pub auth_type: Option<String>,

    /// Base URL of the hosting service API.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Skip TLS verification when talking to the service.
    #[serde(default)]
    pub skip_verify: bool,

    #[serde(default)]
    pub oauth2_client_id: Option<String>,
}

/// Summary of a remote source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSourceResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub auth_type: Option<String>,
}

/// A page of remote sources.
pub type RemoteSourcesResponse = Vec<RemoteSourceResponse>;

/// Parameters for registering a remote source.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRemoteSourceRequest {
    pub name: String,

    #[serde(rename = "type")]
    pub source_type: String,

    pub api_url: String,

    pub auth_type: String,

    #[serde(default)]
    pub skip_verify: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth2_client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth2_client_secret: Option<String>,
}

impl std::fmt::Debug for CreateRemoteSourceRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateRemoteSourceRequest")
            .field("name", &self.name)
            .field("source_type", &self.source_type)
            .field("api_url", &self.api_url)
            .field("auth_type", &self.auth_type)
            .field("skip_verify", &self.skip_verify)
            .field("oauth2_client_id", &self.oauth2_client_id)
            .finish_non_exhaustive()
    }
}

impl AgolaClient {
    /// Get a remote source by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_remote_source(
        &self,
        remote_source_id: &str,
    ) -> Result<ApiResponse<RemoteSourceResponse>> {
        let path = join_path(["remotesource", escape_segment(remote_source_id)?.as_str()]);
        self.execute(ApiRequest::get(path)).await
    }

    /// List remote sources.
    #[tracing::instrument(skip(self))]
    pub async fn get_remote_sources(
        &self,
        opts: &ListOptions,
    ) -> Result<ApiResponse<RemoteSourcesResponse>> {
        self.execute(ApiRequest::get("/remotesources").with_query(opts.to_query()))
            .await
    }

    /// Register a remote source.
    #[tracing::instrument(skip(self, req), fields(remote_source = %req.name))]
    pub async fn create_remote_source(
        &self,
        req: &CreateRemoteSourceRequest,
    ) -> Result<ApiResponse<RemoteSource>> {
        let request = ApiRequest::put("/remotesources").with_json(req)?;
        self.execute(request).await
    }

    /// Delete a remote source by name.
    #[tracing::instrument(skip(self))]
    pub async fn delete_remote_source(&self, name: &str) -> Result<RawResponse> {
        let path = join_path(["remotesources", escape_segment(name)?.as_str()]);
        self.execute_empty(ApiRequest::delete(path)).await
    }
}
