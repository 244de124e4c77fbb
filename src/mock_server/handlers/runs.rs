//! Run endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

use super::{values_of, PageQuery, SharedState};
use crate::mock_server::fixtures::MockRun;
use crate::mock_server::state::MockError;
use crate::{RunsResponse, RunsResponseItem};

/// GET /run/{id}
pub async fn get_run(
    State(state): State<SharedState>,
    Path(run_id): Path<String>,
) -> Result<impl IntoResponse, MockError> {
    let state = state.read().await;
    state
        .runs
        .get(&run_id)
        .map(|r| Json(r.run.clone()))
        .ok_or_else(|| MockError::NotFound(format!("run {run_id} not found")))
}

/// GET /runs
///
/// `phase`, `group` and `rungroup` may each be repeated.
pub async fn list_runs(
    State(state): State<SharedState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, MockError> {
    let page = PageQuery::from_pairs(&pairs)?;
    let state = state.read().await;

    let runs = state.list_runs(
        &values_of(&pairs, "phase"),
        &values_of(&pairs, "group"),
        &values_of(&pairs, "rungroup"),
    );

    Ok(Json(RunsResponse {
        runs: page.apply(runs).into_iter().map(summary).collect(),
    }))
}

fn summary(mock: MockRun) -> RunsResponseItem {
    let run = mock.run;
    RunsResponseItem {
        id: run.id,
        counter: run.counter,
        name: run.name,
        phase: run.phase,
        result: run.result,
        annotations: run.annotations,
        enqueue_time: run.enqueue_time,
    }
}
