//! Remote source endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{PageQuery, SharedState};
use crate::mock_server::state::MockError;
use crate::CreateRemoteSourceRequest;

/// GET /remotesource/{id}
pub async fn get_remote_source(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MockError> {
    let state = state.read().await;
    state
        .get_remote_source(&id)
        .map(Json)
        .ok_or_else(|| MockError::NotFound(format!("remote source {id} not found")))
}

/// GET /remotesources
pub async fn list_remote_sources(
    State(state): State<SharedState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, MockError> {
    let page = PageQuery::from_pairs(&pairs)?;
    let state = state.read().await;
    Ok(Json(page.apply(state.list_remote_sources())))
}

/// PUT /remotesources
pub async fn create_remote_source(
    State(state): State<SharedState>,
    Json(req): Json<CreateRemoteSourceRequest>,
) -> Result<impl IntoResponse, MockError> {
    let rs = state.write().await.create_remote_source(req)?;
    Ok((StatusCode::CREATED, Json(rs)))
}

/// DELETE /remotesources/{name}
pub async fn delete_remote_source(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, MockError> {
    state.write().await.delete_remote_source(&name)?;
    Ok(StatusCode::NO_CONTENT)
}
