//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};

use crate::{
    OrgResponse, OwnerType, Project, RemoteSource, RunPhase, RunResponse, RunResponseTask,
    RunResult, User,
};

/// A run together with the group it was started in.
#[derive(Debug, Clone)]
pub struct MockRun {
    /// Run group (e.g., "/project/p1/branch/main").
    pub group: String,
    pub run: RunResponse,
}

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// Default scenario containing a complete set of related test data.
pub struct DefaultScenario {
    pub current_user: String,
    pub users: Vec<User>,
    pub orgs: Vec<OrgResponse>,
    pub remote_sources: Vec<RemoteSource>,
    pub projects: Vec<Project>,
    pub runs: Vec<MockRun>,
}

impl Fixtures {
    // =========================================================================
    // User and Org Fixtures
    // =========================================================================

    /// Create a user without linked accounts.
    pub fn user(id: &str, user_name: &str) -> User {
        User {
            id: id.to_string(),
            user_name: user_name.to_string(),
            linked_accounts: BTreeMap::new(),
        }
    }

    /// Create an organization.
    pub fn org(id: &str, name: &str) -> OrgResponse {
        OrgResponse {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    // =========================================================================
    // Project Fixtures
    // =========================================================================

    /// Create a project owned by `owner_name`.
    ///
    /// The owner ID is left unset; only the path ties the project to its owner.
    pub fn project(id: &str, owner_type: OwnerType, owner_name: &str, name: &str) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            owner_type: Some(owner_type),
            owner_id: None,
            path: Some(format!("{owner_type}/{owner_name}/{name}")),
            remote_source_id: None,
            repository_path: None,
            skip_ssh_host_key_check: false,
        }
    }

    // =========================================================================
    // Remote Source Fixtures
    // =========================================================================

    /// Create a gitea remote source using password auth.
    pub fn gitea_remote_source(id: &str, name: &str) -> RemoteSource {
        RemoteSource {
            id: id.to_string(),
            name: name.to_string(),
            source_type: Some("gitea".to_string()),
            auth_type: Some("password".to_string()),
            api_url: Some("https://gitea.example.com".to_string()),
            skip_verify: false,
            oauth2_client_id: None,
        }
    }

    // =========================================================================
    // Run Fixtures
    // =========================================================================

    /// Create a run in `group` with a single task.
    pub fn run(
        id: &str,
        counter: u64,
        group: &str,
        phase: RunPhase,
        result: RunResult,
    ) -> MockRun {
        let enqueued = Utc
            .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .single()
            .map(|t| t + chrono::Duration::minutes(counter as i64));

        let mut tasks = BTreeMap::new();
        tasks.insert(
            format!("{id}-build"),
            RunResponseTask {
                id: format!("{id}-build"),
                name: "build".to_string(),
                status: Some(if phase == RunPhase::Finished {
                    result.as_str().to_string()
                } else {
                    "notstarted".to_string()
                }),
                level: 0,
                start_time: None,
                end_time: None,
            },
        );

        MockRun {
            group: group.to_string(),
            run: RunResponse {
                id: id.to_string(),
                counter,
                name: "build".to_string(),
                phase,
                result,
                stopping: false,
                enqueue_time: enqueued,
                start_time: None,
                end_time: None,
                annotations: BTreeMap::new(),
                tasks,
            },
        }
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// Create the default scenario: user alice (authenticated) and bob, org
    /// acme, one gitea remote source, three projects and four runs.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            current_user: "alice".to_string(),
            users: vec![Self::user("u-alice", "alice"), Self::user("u-bob", "bob")],
            orgs: vec![Self::org("o-acme", "acme")],
            remote_sources: vec![Self::gitea_remote_source("rs-gitea", "gitea")],
            projects: vec![
                Self::project("p-app", OwnerType::User, "alice", "app"),
                Self::project("p-lib", OwnerType::User, "alice", "lib"),
                Self::project("p-site", OwnerType::Org, "acme", "site"),
            ],
            runs: vec![
                Self::run("r-1", 1, "/project/p-app/branch/main", RunPhase::Finished, RunResult::Success),
                Self::run("r-2", 2, "/project/p-app/branch/main", RunPhase::Finished, RunResult::Failed),
                Self::run("r-3", 3, "/project/p-app/branch/dev", RunPhase::Running, RunResult::Unknown),
                Self::run("r-4", 1, "/project/p-site/branch/main", RunPhase::Queued, RunResult::Unknown),
            ],
        }
    }
}
