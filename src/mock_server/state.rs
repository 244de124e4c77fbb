//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Agola gateway.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::fixtures::MockRun;
use crate::{
    CreateProjectRequest, CreateRemoteSourceRequest, CreateUserLaRequest, CreateUserLaResponse,
    LinkedAccount, OrgResponse, OwnerType, Project, RemoteSource, RemoteSourceResponse, User,
    UserResponse,
};

/// Failures of mock state operations, mapped to HTTP statuses by the handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    /// 404.
    NotFound(String),
    /// 409.
    AlreadyExists(String),
    /// 400.
    BadRequest(String),
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// User name that `user/projects` and friends resolve to.
    pub current_user: Option<String>,

    /// Users indexed by user name.
    pub users: BTreeMap<String, User>,

    /// Organizations indexed by name.
    pub orgs: BTreeMap<String, OrgResponse>,

    /// Remote sources indexed by name.
    pub remote_sources: BTreeMap<String, RemoteSource>,

    /// Projects indexed by path (e.g., "org/acme/site").
    pub projects: BTreeMap<String, Project>,

    /// Runs indexed by ID.
    pub runs: BTreeMap<String, MockRun>,

    /// Issued user tokens: token value to user name.
    pub tokens: BTreeMap<String, String>,

    /// Optional authentication token. If set, requests must send
    /// `Authorization: token <required_token>`.
    pub required_token: Option<String>,

    next_id: u64,
}

/// Select one page of `items`, which must be sorted by key.
///
/// `start` is exclusive: the page begins after it in the requested order.
pub fn paginate<T>(mut items: Vec<(String, T)>, start: &str, limit: i64, asc: bool) -> Vec<T> {
    if !asc {
        items.reverse();
    }
    let take = if limit > 0 { limit as usize } else { usize::MAX };

    items
        .into_iter()
        .filter(|(key, _)| {
            start.is_empty() || if asc { key.as_str() > start } else { key.as_str() < start }
        })
        .take(take)
        .map(|(_, item)| item)
        .collect()
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Set the authenticated user.
    pub fn with_current_user(mut self, user_name: &str) -> Self {
        self.current_user = Some(user_name.to_string());
        self
    }

    /// Add a user to the state.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.user_name.clone(), user);
        self
    }

    /// Add an organization to the state.
    pub fn with_org(mut self, org: OrgResponse) -> Self {
        self.orgs.insert(org.name.clone(), org);
        self
    }

    /// Add a remote source to the state.
    pub fn with_remote_source(mut self, rs: RemoteSource) -> Self {
        self.remote_sources.insert(rs.name.clone(), rs);
        self
    }

    /// Add a project to the state. Projects without a path are keyed by name.
    pub fn with_project(mut self, project: Project) -> Self {
        let key = project.path.clone().unwrap_or_else(|| project.name.clone());
        self.projects.insert(key, project);
        self
    }

    /// Add a run to the state.
    pub fn with_run(mut self, run: MockRun) -> Self {
        self.runs.insert(run.run.id.clone(), run);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{:04}", self.next_id)
    }

    /// Resolve an owner name, where empty means the current user.
    fn owner_name(&self, owner_type: OwnerType, owner_name: &str) -> Result<String, MockError> {
        if !owner_name.is_empty() {
            return Ok(owner_name.to_string());
        }
        match (owner_type, &self.current_user) {
            (OwnerType::User, Some(user)) => Ok(user.clone()),
            _ => Err(MockError::BadRequest("no authenticated user".to_string())),
        }
    }

    fn check_owner(&self, owner_type: OwnerType, owner_name: &str) -> Result<(), MockError> {
        let exists = match owner_type {
            OwnerType::User => self.users.contains_key(owner_name),
            OwnerType::Org => self.orgs.contains_key(owner_name),
        };
        if exists {
            Ok(())
        } else {
            Err(MockError::NotFound(format!("{owner_type} {owner_name} not found")))
        }
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Get a project by ID or path.
    pub fn get_project(&self, id_or_path: &str) -> Option<&Project> {
        self.projects
            .get(id_or_path)
            .or_else(|| self.projects.values().find(|p| p.id == id_or_path))
    }

    /// List projects of an owner, keyed by project name.
    pub fn list_projects(
        &self,
        owner_type: OwnerType,
        owner_name: &str,
    ) -> Result<Vec<(String, Project)>, MockError> {
        let owner = self.owner_name(owner_type, owner_name)?;
        self.check_owner(owner_type, &owner)?;
        let prefix = format!("{owner_type}/{owner}/");

        let mut projects: Vec<(String, Project)> = self
            .projects
            .iter()
            .filter(|(path, _)| path.starts_with(&prefix))
            .map(|(_, p)| (p.name.clone(), p.clone()))
            .collect();
        projects.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(projects)
    }

    /// Create a project for an owner.
    pub fn create_project(
        &mut self,
        owner_type: OwnerType,
        owner_name: &str,
        req: CreateProjectRequest,
    ) -> Result<Project, MockError> {
        if req.name.is_empty() {
            return Err(MockError::BadRequest("empty project name".to_string()));
        }
        let owner = self.owner_name(owner_type, owner_name)?;
        self.check_owner(owner_type, &owner)?;

        let rs = self
            .remote_sources
            .get(&req.remote_source_name)
            .ok_or_else(|| {
                MockError::BadRequest(format!(
                    "remote source {} not found",
                    req.remote_source_name
                ))
            })?;
        let remote_source_id = rs.id.clone();

        let path = format!("{owner_type}/{owner}/{}", req.name);
        if self.projects.contains_key(&path) {
            return Err(MockError::AlreadyExists(format!("project {path} already exists")));
        }

        let owner_id = match owner_type {
            OwnerType::User => self.users.get(&owner).map(|u| u.id.clone()),
            OwnerType::Org => self.orgs.get(&owner).map(|o| o.id.clone()),
        };

        let project = Project {
            id: self.next_id("p"),
            name: req.name,
            owner_type: Some(owner_type),
            owner_id,
            path: Some(path.clone()),
            remote_source_id: Some(remote_source_id),
            repository_path: Some(req.repo_path),
            skip_ssh_host_key_check: req.skip_ssh_host_key_check,
        };
        self.projects.insert(path, project.clone());
        Ok(project)
    }

    /// Delete a project of an owner.
    pub fn delete_project(
        &mut self,
        owner_type: OwnerType,
        owner_name: &str,
        project_name: &str,
    ) -> Result<(), MockError> {
        let owner = self.owner_name(owner_type, owner_name)?;
        let path = format!("{owner_type}/{owner}/{project_name}");
        self.projects
            .remove(&path)
            .map(|_| ())
            .ok_or_else(|| MockError::NotFound(format!("project {path} not found")))
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Get a user by ID.
    pub fn get_user(&self, id: &str) -> Option<&User> {
        self.users.values().find(|u| u.id == id)
    }

    /// List user summaries keyed by user name.
    pub fn list_users(&self) -> Vec<(String, UserResponse)> {
        self.users
            .values()
            .map(|u| {
                (
                    u.user_name.clone(),
                    UserResponse {
                        id: u.id.clone(),
                        username: u.user_name.clone(),
                    },
                )
            })
            .collect()
    }

    /// Create a user.
    pub fn create_user(&mut self, user_name: &str) -> Result<UserResponse, MockError> {
        if user_name.is_empty() {
            return Err(MockError::BadRequest("empty user name".to_string()));
        }
        if self.users.contains_key(user_name) {
            return Err(MockError::AlreadyExists(format!("user {user_name} already exists")));
        }

        let id = self.next_id("u");
        self.users.insert(
            user_name.to_string(),
            User {
                id: id.clone(),
                user_name: user_name.to_string(),
                linked_accounts: BTreeMap::new(),
            },
        );
        Ok(UserResponse {
            id,
            username: user_name.to_string(),
        })
    }

    /// Delete a user and the projects it owns.
    pub fn delete_user(&mut self, user_name: &str) -> Result<(), MockError> {
        self.users
            .remove(user_name)
            .ok_or_else(|| MockError::NotFound(format!("user {user_name} not found")))?;
        let prefix = format!("user/{user_name}/");
        self.projects.retain(|path, _| !path.starts_with(&prefix));
        Ok(())
    }

    /// Link a remote source account to a user.
    pub fn create_linked_account(
        &mut self,
        user_name: &str,
        req: CreateUserLaRequest,
    ) -> Result<CreateUserLaResponse, MockError> {
        let rs = self
            .remote_sources
            .get(&req.remote_source_name)
            .ok_or_else(|| {
                MockError::BadRequest(format!(
                    "remote source {} not found",
                    req.remote_source_name
                ))
            })?;
        let remote_source_id = rs.id.clone();
        let oauth2 = rs.auth_type.as_deref() == Some("oauth2");
        let api_url = rs.api_url.clone().unwrap_or_default();

        if !self.users.contains_key(user_name) {
            return Err(MockError::NotFound(format!("user {user_name} not found")));
        }

        if oauth2 {
            return Ok(CreateUserLaResponse {
                linked_account: None,
                oauth2_redirect: Some(format!("{api_url}/login/oauth/authorize")),
            });
        }

        let la = LinkedAccount {
            id: self.next_id("la"),
            remote_source_id: Some(remote_source_id),
            remote_user_id: Some(format!("remote-{}", req.remote_source_login_name)),
            remote_user_name: Some(req.remote_source_login_name),
        };
        if let Some(user) = self.users.get_mut(user_name) {
            user.linked_accounts.insert(la.id.clone(), la.clone());
        }
        Ok(CreateUserLaResponse {
            linked_account: Some(la),
            oauth2_redirect: None,
        })
    }

    /// Remove a linked account from a user.
    pub fn delete_linked_account(&mut self, user_name: &str, la_id: &str) -> Result<(), MockError> {
        let user = self
            .users
            .get_mut(user_name)
            .ok_or_else(|| MockError::NotFound(format!("user {user_name} not found")))?;
        user.linked_accounts
            .remove(la_id)
            .map(|_| ())
            .ok_or_else(|| MockError::NotFound(format!("linked account {la_id} not found")))
    }

    /// Issue a token for a user.
    pub fn create_token(&mut self, user_name: &str, token_name: &str) -> Result<String, MockError> {
        if token_name.is_empty() {
            return Err(MockError::BadRequest("empty token name".to_string()));
        }
        if !self.users.contains_key(user_name) {
            return Err(MockError::NotFound(format!("user {user_name} not found")));
        }
        let token = format!("{}-{user_name}-{token_name}", self.next_id("tok"));
        self.tokens.insert(token.clone(), user_name.to_string());
        Ok(token)
    }

    // =========================================================================
    // Runs
    // =========================================================================

    /// List runs matching the filters, keyed by run ID.
    ///
    /// `groups` match as prefixes, `run_groups` exactly; empty filters match all.
    pub fn list_runs(
        &self,
        phases: &[String],
        groups: &[String],
        run_groups: &[String],
    ) -> Vec<(String, MockRun)> {
        self.runs
            .iter()
            .filter(|(_, r)| phases.is_empty() || phases.iter().any(|p| p == r.run.phase.as_str()))
            .filter(|(_, r)| groups.is_empty() || groups.iter().any(|g| r.group.starts_with(g.as_str())))
            .filter(|(_, r)| run_groups.is_empty() || run_groups.iter().any(|g| *g == r.group))
            .map(|(id, r)| (id.clone(), r.clone()))
            .collect()
    }

    // =========================================================================
    // Remote sources
    // =========================================================================

    /// Get a remote source summary by ID.
    pub fn get_remote_source(&self, id: &str) -> Option<RemoteSourceResponse> {
        self.remote_sources
            .values()
            .find(|rs| rs.id == id)
            .map(Self::remote_source_summary)
    }

    fn remote_source_summary(rs: &RemoteSource) -> RemoteSourceResponse {
        RemoteSourceResponse {
            id: rs.id.clone(),
            name: rs.name.clone(),
            auth_type: rs.auth_type.clone(),
        }
    }

    /// List remote source summaries keyed by name.
    pub fn list_remote_sources(&self) -> Vec<(String, RemoteSourceResponse)> {
        self.remote_sources
            .iter()
            .map(|(name, rs)| (name.clone(), Self::remote_source_summary(rs)))
            .collect()
    }

    /// Register a remote source.
    pub fn create_remote_source(
        &mut self,
        req: CreateRemoteSourceRequest,
    ) -> Result<RemoteSource, MockError> {
        if req.name.is_empty() {
            return Err(MockError::BadRequest("empty remote source name".to_string()));
        }
        if self.remote_sources.contains_key(&req.name) {
            return Err(MockError::AlreadyExists(format!(
                "remote source {} already exists",
                req.name
            )));
        }

        let rs = RemoteSource {
            id: self.next_id("rs"),
            name: req.name,
            source_type: Some(req.source_type),
            auth_type: Some(req.auth_type),
            api_url: Some(req.api_url),
            skip_verify: req.skip_verify,
            oauth2_client_id: req.oauth2_client_id,
        };
        self.remote_sources.insert(rs.name.clone(), rs.clone());
        Ok(rs)
    }

    /// Delete a remote source by name.
    pub fn delete_remote_source(&mut self, name: &str) -> Result<(), MockError> {
        self.remote_sources
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| MockError::NotFound(format!("remote source {name} not found")))
    }

    // =========================================================================
    // Orgs
    // =========================================================================

    /// Create an organization.
    pub fn create_org(&mut self, name: &str) -> Result<OrgResponse, MockError> {
        if name.is_empty() {
            return Err(MockError::BadRequest("empty org name".to_string()));
        }
        if self.orgs.contains_key(name) {
            return Err(MockError::AlreadyExists(format!("org {name} already exists")));
        }
        let org = OrgResponse {
            id: self.next_id("o"),
            name: name.to_string(),
        };
        self.orgs.insert(name.to_string(), org.clone());
        Ok(org)
    }

    /// Delete an organization and the projects it owns.
    pub fn delete_org(&mut self, name: &str) -> Result<(), MockError> {
        self.orgs
            .remove(name)
            .ok_or_else(|| MockError::NotFound(format!("org {name} not found")))?;
        let prefix = format!("org/{name}/");
        self.projects.retain(|path, _| !path.starts_with(&prefix));
        Ok(())
    }
}
