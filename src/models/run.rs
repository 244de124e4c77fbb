//! Run models and operations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::AgolaClient;
use crate::error::Result;
use crate::pagination::ListOptions;
use crate::request::{escape_segment, join_path, ApiRequest, QueryParams};
use crate::response::ApiResponse;

/// Lifecycle phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    SetupError,
    Queued,
    Cancelled,
    Running,
    Finished,
    /// A phase this client does not know about.
    #[serde(other)]
    Unknown,
}

impl RunPhase {
    /// The wire name, as used by the `phase` filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::SetupError => "setuperror",
            RunPhase::Queued => "queued",
            RunPhase::Cancelled => "cancelled",
            RunPhase::Running => "running",
            RunPhase::Finished => "finished",
            RunPhase::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunResult {
    Stopped,
    Success,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RunResult {
    /// The wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunResult::Unknown => "unknown",
            RunResult::Stopped => "stopped",
            RunResult::Success => "success",
            RunResult::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run with its tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResponse {
    pub id: String,

    /// Sequence number of the run within its group.
    #[serde(default)]
    pub counter: u64,

    pub name: String,

    pub phase: RunPhase,

    #[serde(default)]
    pub result: RunResult,

    /// Whether a stop was requested and is in progress.
    #[serde(default)]
    pub stopping: bool,

    #[serde(default)]
    pub enqueue_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,

    /// Free-form metadata (commit sha, branch, event type, ...).
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,

    /// Tasks indexed by task ID.
    #[serde(default)]
    pub tasks: BTreeMap<String, RunResponseTask>,
}

impl RunResponse {
    /// Returns true once the run can no longer change.
    pub fn is_done(&self) -> bool {
        matches!(
            self.phase,
            RunPhase::Finished | RunPhase::Cancelled | RunPhase::SetupError
        )
    }
}

/// A task of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResponseTask {
    pub id: String,
    pub name: String,

    /// Task status (e.g., "notstarted", "running", "success", "failed").
    #[serde(default)]
    pub status: Option<String>,

    /// Depth of the task in the run graph.
    #[serde(default)]
    pub level: i64,

    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// A run as listed by `GET /runs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunsResponseItem {
    pub id: String,

    #[serde(default)]
    pub counter: u64,

    pub name: String,

    pub phase: RunPhase,

    #[serde(default)]
    pub result: RunResult,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,

    #[serde(default)]
    pub enqueue_time: Option<DateTime<Utc>>,
}

/// A page of runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunsResponse {
    #[serde(default)]
    pub runs: Vec<RunsResponseItem>,
}

/// Filters for listing runs.
///
/// Each value becomes one repeated query parameter, in the order given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilter {
    /// Only runs in these phases (`phase`).
    pub phases: Vec<String>,
    /// Only runs in these groups (`group`).
    pub groups: Vec<String>,
    /// Only runs in these run groups (`rungroup`).
    pub run_groups: Vec<String>,
}

impl RunFilter {
    /// Add a phase filter.
    #[must_use]
    pub fn phase(mut self, phase: impl Into<String>) -> Self {
        self.phases.push(phase.into());
        self
    }

    /// Add a group filter.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Add a run group filter.
    #[must_use]
    pub fn run_group(mut self, run_group: impl Into<String>) -> Self {
        self.run_groups.push(run_group.into());
        self
    }

    /// Append the filters to `query`.
    pub fn apply(&self, query: &mut QueryParams) {
        query.extend("phase", self.phases.iter().cloned());
        query.extend("group", self.groups.iter().cloned());
        query.extend("rungroup", self.run_groups.iter().cloned());
    }
}

impl From<RunPhase> for String {
    fn from(phase: RunPhase) -> Self {
        phase.as_str().to_string()
    }
}

impl AgolaClient {
    /// Get a run by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_run(&self, run_id: &str) -> Result<ApiResponse<RunResponse>> {
        let path = join_path(["run", escape_segment(run_id)?.as_str()]);
        self.execute(ApiRequest::get(path)).await
    }

    /// List runs matching `filter`.
    #[tracing::instrument(skip(self))]
    pub async fn get_runs(
        &self,
        filter: &RunFilter,
        opts: &ListOptions,
    ) -> Result<ApiResponse<RunsResponse>> {
        let mut query = QueryParams::new();
        filter.apply(&mut query);
        opts.apply(&mut query);

        self.execute(ApiRequest::get("/runs").with_query(query))
            .await
    }
}
