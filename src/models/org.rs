//! Organization models and operations.

use serde::{Deserialize, Serialize};

use crate::client::AgolaClient;
use crate::error::Result;
use crate::request::{escape_segment, join_path, ApiRequest};
use crate::response::{ApiResponse, RawResponse};

/// Parameters for creating an organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateOrgRequest {
    pub name: String,
}

/// An organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgResponse {
    pub id: String,
    pub name: String,
}

impl AgolaClient {
    /// Create an organization.
    #[tracing::instrument(skip(self, req), fields(org = %req.name))]
    pub async fn create_org(&self, req: &CreateOrgRequest) -> Result<ApiResponse<OrgResponse>> {
        let request = ApiRequest::put("/orgs").with_json(req)?;
        self.execute(request).await
    }

    /// Delete an organization by name.
    #[tracing::instrument(skip(self))]
    pub async fn delete_org(&self, org_name: &str) -> Result<RawResponse> {
        let path = join_path(["orgs", escape_segment(org_name)?.as_str()]);
        self.execute_empty(ApiRequest::delete(path)).await
    }
}
