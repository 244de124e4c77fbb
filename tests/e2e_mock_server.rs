//! E2E tests using the mock Agola gateway.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use agolapi::mock_server::{Fixtures, MockServer, MockState};
use agolapi::{
    AgolaClient, CreateOrgRequest, CreateProjectRequest, CreateRemoteSourceRequest,
    CreateUserLaRequest, CreateUserRequest, CreateUserTokenRequest, ListOptions, RunFilter,
    RunPhase,
};
use reqwest::StatusCode;

fn client(server: &MockServer) -> AgolaClient {
    AgolaClient::new(server.url(), "test-token").unwrap()
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Project Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_list_then_get_project_workflow() {
    let server = MockServer::start().await;
    let client = client(&server);

    let page = client
        .get_org_projects("acme", &ListOptions::default())
        .await
        .expect("Failed to list projects");
    assert_eq!(page.data.len(), 1);

    let listed = &page.data.projects[0];
    let project = client
        .get_project(&listed.id)
        .await
        .expect("Failed to get project");
    assert_eq!(project.data, *listed);

    server.shutdown().await;
}

#[tokio::test]
async fn test_project_paging_with_cursor() {
    let server = MockServer::start().await;
    let client = client(&server);

    let first = client
        .get_user_projects("alice", &ListOptions::new("", 1, true))
        .await
        .unwrap()
        .data;
    assert_eq!(first.projects[0].name, "app");

    let second = client
        .get_user_projects("alice", &ListOptions::new("app", 1, true))
        .await
        .unwrap()
        .data;
    assert_eq!(second.projects[0].name, "lib");

    let descending = client
        .get_user_projects("alice", &ListOptions::default())
        .await
        .unwrap()
        .data;
    let names: Vec<_> = descending.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["lib", "app"]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_create_reconfig_delete_project_workflow() {
    let server = MockServer::start().await;
    let client = client(&server);

    let req = CreateProjectRequest {
        name: "tools".to_string(),
        remote_source_name: "gitea".to_string(),
        repo_path: "alice/tools".to_string(),
        skip_ssh_host_key_check: false,
    };

    let created = client.create_current_user_project(&req).await.unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(created.data.path.as_deref(), Some("user/alice/tools"));
    assert_eq!(created.data.owner_id.as_deref(), Some("u-alice"));

    let dup = client.create_user_project("alice", &req).await.unwrap_err();
    assert_eq!(dup.status(), Some(StatusCode::CONFLICT));
    assert_eq!(dup.to_string(), "project user/alice/tools already exists");

    client.reconfig_project("user/alice/tools").await.unwrap();

    client.delete_current_user_project("tools").await.unwrap();
    let gone = client.get_project("user/alice/tools").await.unwrap_err();
    assert_eq!(gone.status(), Some(StatusCode::NOT_FOUND));

    server.shutdown().await;
}

// =============================================================================
// User Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_user_lifecycle_workflow() {
    let server = MockServer::start().await;
    let client = client(&server);

    let created = client
        .create_user(&CreateUserRequest {
            user_name: "carol".to_string(),
        })
        .await
        .unwrap()
        .data;

    let la = client
        .create_user_linked_account(
            "carol",
            &CreateUserLaRequest {
                remote_source_name: "gitea".to_string(),
                remote_source_login_name: "carol".to_string(),
                remote_source_login_password: "pw".to_string(),
            },
        )
        .await
        .unwrap()
        .data
        .linked_account
        .expect("password auth links directly");

    let token = client
        .create_user_token(
            "carol",
            &CreateUserTokenRequest {
                token_name: "ci".to_string(),
            },
        )
        .await
        .unwrap()
        .data;
    assert!(!token.token.is_empty());

    let user = client.get_user(&created.id).await.unwrap().data;
    assert!(user.linked_accounts.contains_key(&la.id));

    client
        .delete_user_linked_account("carol", &la.id)
        .await
        .unwrap();
    client.delete_user("carol").await.unwrap();

    let users = client.get_users(&ListOptions::default()).await.unwrap().data;
    assert!(users.iter().all(|u| u.username != "carol"));

    server.shutdown().await;
}

// =============================================================================
// Run Tests
// =============================================================================

#[tokio::test]
async fn test_run_filters_against_mock() {
    let server = MockServer::start().await;
    let client = client(&server);

    let finished = client
        .get_runs(
            &RunFilter::default().phase(RunPhase::Finished),
            &ListOptions::default(),
        )
        .await
        .unwrap()
        .data;
    assert_eq!(finished.runs.len(), 2);

    let app_main = client
        .get_runs(
            &RunFilter::default().run_group("/project/p-app/branch/main"),
            &ListOptions::default().ascending(),
        )
        .await
        .unwrap()
        .data;
    let ids: Vec<_> = app_main.runs.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["r-1", "r-2"]);

    let app = client
        .get_runs(
            &RunFilter::default().group("/project/p-app"),
            &ListOptions::default(),
        )
        .await
        .unwrap()
        .data;
    assert_eq!(app.runs.len(), 3);

    let run = client.get_run("r-3").await.unwrap().data;
    assert_eq!(run.phase, RunPhase::Running);
    assert!(!run.is_done());

    server.shutdown().await;
}

// =============================================================================
// Remote Source and Org Tests
// =============================================================================

#[tokio::test]
async fn test_remote_source_and_org_workflow() {
    let server = MockServer::start_empty().await;
    let client = client(&server);

    let rs = client
        .create_remote_source(&CreateRemoteSourceRequest {
            name: "gitlab".to_string(),
            source_type: "gitlab".to_string(),
            api_url: "https://gitlab.example.com".to_string(),
            auth_type: "password".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
        .data;

    let fetched = client.get_remote_source(&rs.id).await.unwrap().data;
    assert_eq!(fetched.name, "gitlab");

    client
        .create_org(&CreateOrgRequest {
            name: "acme".to_string(),
        })
        .await
        .unwrap();

    let resp = client.delete_org("acme").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let err = client.delete_org("acme").await.unwrap_err();
    assert_eq!(err.to_string(), "org acme not found");

    client.delete_remote_source("gitlab").await.unwrap();
    let sources = client
        .get_remote_sources(&ListOptions::default())
        .await
        .unwrap()
        .data;
    assert!(sources.is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn test_custom_state_with_required_token() {
    let state = MockState::new()
        .with_required_token("secret")
        .with_user(Fixtures::user("u1", "dave"));
    let server = MockServer::with_state(state).await;

    let anonymous = client(&server);
    let err = anonymous.get_user("u1").await.unwrap_err();
    assert_eq!(err.to_string(), "unauthorized");

    let authed = AgolaClient::new(server.url(), "secret").unwrap();
    let user = authed.get_user("u1").await.unwrap().data;
    assert_eq!(user.user_name, "dave");

    server.shutdown().await;
}
