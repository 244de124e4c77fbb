//! Project model and project operations.

use serde::{Deserialize, Serialize};

use crate::client::AgolaClient;
use crate::error::Result;
use crate::models::OwnerType;
use crate::pagination::ListOptions;
use crate::request::{escape_segment, join_path, ApiRequest};
use crate::response::{ApiResponse, RawResponse};

/// An Agola project.
///
/// A project binds a repository on a remote source to an owner (a user or
/// an organization). Runs are started for a project when its repository
/// receives events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID.
    pub id: String,

    /// Project name, unique within its owner.
    pub name: String,

    /// Whether the owner is a user or an organization.
    #[serde(default)]
    pub owner_type: Option<OwnerType>,

    /// ID of the owning user or organization.
    #[serde(default)]
    pub owner_id: Option<String>,

    /// Full project path (e.g., "org/acme/app").
    #[serde(default)]
    pub path: Option<String>,

    /// ID of the remote source hosting the repository.
    #[serde(default)]
    pub remote_source_id: Option<String>,

    /// Repository path on the remote source (e.g., "acme/app").
    #[serde(default)]
    pub repository_path: Option<String>,

    /// Whether ssh host key checking is disabled for clones.
    #[serde(default)]
    pub skip_ssh_host_key_check: bool,
}

/// Parameters for creating a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    /// Project name.
    pub name: String,

    /// Name of the remote source hosting the repository.
    pub remote_source_name: String,

    /// Repository path on the remote source.
    pub repo_path: String,

    /// Disable ssh host key checking for clones.
    #[serde(default)]
    pub skip_ssh_host_key_check: bool,
}

/// A page of projects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectsResponse {
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl ProjectsResponse {
    /// Returns true if this page has no projects.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Returns the number of projects on this page.
    pub fn len(&self) -> usize {
        self.projects.len()
    }
}

impl AgolaClient {
    /// Get a project by ID or path.
    #[tracing::instrument(skip(self))]
    pub async fn get_project(&self, project_id: &str) -> Result<ApiResponse<Project>> {
        let path = join_path(["project", escape_segment(project_id)?.as_str()]);
        self.execute(ApiRequest::get(path)).await
    }

    /// List projects of the authenticated user.
    pub async fn get_current_user_projects(
        &self,
        opts: &ListOptions,
    ) -> Result<ApiResponse<ProjectsResponse>> {
        self.get_projects(OwnerType::User, "", opts).await
    }

    /// List projects of a user.
    pub async fn get_user_projects(
        &self,
        user_name: &str,
        opts: &ListOptions,
    ) -> Result<ApiResponse<ProjectsResponse>> {
        self.get_projects(OwnerType::User, user_name, opts).await
    }

    /// List projects of an organization.
    pub async fn get_org_projects(
        &self,
        org_name: &str,
        opts: &ListOptions,
    ) -> Result<ApiResponse<ProjectsResponse>> {
        self.get_projects(OwnerType::Org, org_name, opts).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_projects(
        &self,
        owner_type: OwnerType,
        owner_name: &str,
        opts: &ListOptions,
    ) -> Result<ApiResponse<ProjectsResponse>> {
        let path = join_path([
            owner_type.as_str(),
            escape_segment(owner_name)?.as_str(),
            "projects",
        ]);
        self.execute(ApiRequest::get(path).with_query(opts.to_query()))
            .await
    }

    /// Create a project owned by the authenticated user.
    pub async fn create_current_user_project(
        &self,
        req: &CreateProjectRequest,
    ) -> Result<ApiResponse<Project>> {
        self.create_project(OwnerType::User, "", req).await
    }

    /// Create a project owned by a user.
    pub async fn create_user_project(
        &self,
        user_name: &str,
        req: &CreateProjectRequest,
    ) -> Result<ApiResponse<Project>> {
        self.create_project(OwnerType::User, user_name, req).await
    }

    /// Create a project owned by an organization.
    pub async fn create_org_project(
        &self,
        org_name: &str,
        req: &CreateProjectRequest,
    ) -> Result<ApiResponse<Project>> {
        self.create_project(OwnerType::Org, org_name, req).await
    }

    #[tracing::instrument(skip(self, req), fields(project = %req.name))]
    async fn create_project(
        &self,
        owner_type: OwnerType,
        owner_name: &str,
        req: &CreateProjectRequest,
    ) -> Result<ApiResponse<Project>> {
        let path = join_path([
            owner_type.as_str(),
            escape_segment(owner_name)?.as_str(),
            "projects",
        ]);
        let request = ApiRequest::put(path).with_json(req)?;
        self.execute(request).await
    }

    /// Delete a project of the authenticated user.
    pub async fn delete_current_user_project(&self, project_name: &str) -> Result<RawResponse> {
        self.delete_project(OwnerType::User, "", project_name).await
    }

    /// Delete a project of a user.
    pub async fn delete_user_project(
        &self,
        user_name: &str,
        project_name: &str,
    ) -> Result<RawResponse> {
        self.delete_project(OwnerType::User, user_name, project_name)
            .await
    }

    /// Delete a project of an organization.
    pub async fn delete_org_project(
        &self,
        org_name: &str,
        project_name: &str,
    ) -> Result<RawResponse> {
        self.delete_project(OwnerType::Org, org_name, project_name)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_project(
        &self,
        owner_type: OwnerType,
        owner_name: &str,
        project_name: &str,
    ) -> Result<RawResponse> {
        let path = join_path([
            "projects",
            owner_type.as_str(),
            escape_segment(owner_name)?.as_str(),
            escape_segment(project_name)?.as_str(),
        ]);
        self.execute_empty(ApiRequest::delete(path)).await
    }

    /// Ask the gateway to reconfigure a project (webhooks, deploy keys).
    #[tracing::instrument(skip(self))]
    pub async fn reconfig_project(&self, project_name: &str) -> Result<RawResponse> {
        let path = join_path(["projects", escape_segment(project_name)?.as_str(), "reconfig"]);
        self.execute_empty(ApiRequest::post(path)).await
    }
}
