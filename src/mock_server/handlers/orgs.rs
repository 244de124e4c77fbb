//! Organization endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::SharedState;
use crate::mock_server::state::MockError;
use crate::CreateOrgRequest;

/// PUT /orgs
pub async fn create_org(
    State(state): State<SharedState>,
    Json(req): Json<CreateOrgRequest>,
) -> Result<impl IntoResponse, MockError> {
    let org = state.write().await.create_org(&req.name)?;
    Ok((StatusCode::CREATED, Json(org)))
}

/// DELETE /orgs/{name}
pub async fn delete_org(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, MockError> {
    state.write().await.delete_org(&name)?;
    Ok(StatusCode::NO_CONTENT)
}
