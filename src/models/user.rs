//! User, linked account and token models and operations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::AgolaClient;
use crate::error::Result;
use crate::pagination::ListOptions;
use crate::request::{escape_segment, join_path, ApiRequest};
use crate::response::{ApiResponse, RawResponse};

/// A full user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: String,

    /// Login name.
    pub user_name: String,

    /// Linked accounts indexed by their ID.
    #[serde(default)]
    pub linked_accounts: BTreeMap<String, LinkedAccount>,
}

/// A binding between an Agola user and an account on a remote source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedAccount {
    /// Linked account ID.
    pub id: String,

    /// ID of the remote source the account lives on.
    #[serde(default)]
    pub remote_source_id: Option<String>,

    /// User ID on the remote source.
    #[serde(default)]
    pub remote_user_id: Option<String>,

    /// User name on the remote source.
    #[serde(default)]
    pub remote_user_name: Option<String>,
}

/// Summary of a user as returned by user endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

/// A page of users.
pub type UsersResponse = Vec<UserResponse>;

/// Parameters for creating a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub user_name: String,
}

/// Parameters for linking a remote source account to a user.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateUserLaRequest {
    pub remote_source_name: String,
    #[serde(default)]
    pub remote_source_login_name: String,
    #[serde(default)]
    pub remote_source_login_password: String,
}

impl std::fmt::Debug for CreateUserLaRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserLaRequest")
            .field("remote_source_name", &self.remote_source_name)
            .field("remote_source_login_name", &self.remote_source_login_name)
            .finish_non_exhaustive()
    }
}

/// Result of linking an account.
///
/// Remote sources using oauth2 answer with a redirect the user must follow
/// to finish the link; the others return the linked account directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateUserLaResponse {
    #[serde(default)]
    pub linked_account: Option<LinkedAccount>,
    #[serde(default)]
    pub oauth2_redirect: Option<String>,
}

/// Parameters for creating a user API token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateUserTokenRequest {
    pub token_name: String,
}

/// A freshly created API token. The value is only shown once.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserTokenResponse {
    pub token: String,
}

impl std::fmt::Debug for CreateUserTokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserTokenResponse")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl AgolaClient {
    /// Get a user by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, user_id: &str) -> Result<ApiResponse<User>> {
        let path = join_path(["user", escape_segment(user_id)?.as_str()]);
        self.execute(ApiRequest::get(path)).await
    }

    /// List users.
    #[tracing::instrument(skip(self))]
    pub async fn get_users(&self, opts: &ListOptions) -> Result<ApiResponse<UsersResponse>> {
        self.execute(ApiRequest::get("/users").with_query(opts.to_query()))
            .await
    }

    /// Create a user.
    #[tracing::instrument(skip(self, req), fields(user = %req.user_name))]
    pub async fn create_user(&self, req: &CreateUserRequest) -> Result<ApiResponse<UserResponse>> {
        let request = ApiRequest::put("/users").with_json(req)?;
        self.execute(request).await
    }

    /// Delete a user.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, user_name: &str) -> Result<RawResponse> {
        let path = join_path(["users", escape_segment(user_name)?.as_str()]);
        self.execute_empty(ApiRequest::delete(path)).await
    }

    /// Link a remote source account to a user.
    #[tracing::instrument(skip(self, req), fields(remote_source = %req.remote_source_name))]
    pub async fn create_user_linked_account(
        &self,
        user_name: &str,
        req: &CreateUserLaRequest,
    ) -> Result<ApiResponse<CreateUserLaResponse>> {
        let path = join_path(["users", escape_segment(user_name)?.as_str(), "linkedaccounts"]);
        let request = ApiRequest::put(path).with_json(req)?;
        self.execute(request).await
    }

    /// Remove a linked account from a user.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user_linked_account(
        &self,
        user_name: &str,
        linked_account_id: &str,
    ) -> Result<RawResponse> {
        let path = join_path([
            "users",
            escape_segment(user_name)?.as_str(),
            "linkedaccounts",
            escape_segment(linked_account_id)?.as_str(),
        ]);
        self.execute_empty(ApiRequest::delete(path)).await
    }

    /// Create an API token for a user.
    #[tracing::instrument(skip(self, req), fields(token = %req.token_name))]
    pub async fn create_user_token(
        &self,
        user_name: &str,
        req: &CreateUserTokenRequest,
    ) -> Result<ApiResponse<CreateUserTokenResponse>> {
        let path = join_path(["users", escape_segment(user_name)?.as_str(), "tokens"]);
        let request = ApiRequest::put(path).with_json(req)?;
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_linked_accounts_default() {
        let user: User = serde_json::from_str(r#"{"id": "u1", "user_name": "alice"}"#).unwrap();
        assert!(user.linked_accounts.is_empty());
    }

    #[test]
    fn test_la_request_debug_hides_password() {
        let req = CreateUserLaRequest {
            remote_source_name: "gitea".to_string(),
            remote_source_login_name: "alice".to_string(),
            remote_source_login_password: "hunter2".to_string(),
        };
        let debug = format!("{req:?}");
        assert!(debug.contains("gitea"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_token_response_debug_redacted() {
        let resp = CreateUserTokenResponse {
            token: "secret-value".to_string(),
        };
        assert!(!format!("{resp:?}").contains("secret-value"));
    }
}
