//! Project endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{PageQuery, SharedState};
use crate::mock_server::state::MockError;
use crate::{CreateProjectRequest, OwnerType, ProjectsResponse};

/// GET /project/{ref}
pub async fn get_project(
    State(state): State<SharedState>,
    Path(project_ref): Path<String>,
) -> Result<impl IntoResponse, MockError> {
    let state = state.read().await;
    state
        .get_project(&project_ref)
        .cloned()
        .map(Json)
        .ok_or_else(|| MockError::NotFound(format!("project {project_ref} not found")))
}

async fn list(
    state: SharedState,
    owner_type: OwnerType,
    owner_name: &str,
    pairs: &[(String, String)],
) -> Result<Json<ProjectsResponse>, MockError> {
    let page = PageQuery::from_pairs(pairs)?;
    let state = state.read().await;
    let projects = state.list_projects(owner_type, owner_name)?;
    Ok(Json(ProjectsResponse {
        projects: page.apply(projects),
    }))
}

/// GET /user/projects
pub async fn list_current_user_projects(
    State(state): State<SharedState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, MockError> {
    list(state, OwnerType::User, "", &pairs).await
}

/// GET /user/{name}/projects
pub async fn list_user_projects(
    State(state): State<SharedState>,
    Path(user_name): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, MockError> {
    list(state, OwnerType::User, &user_name, &pairs).await
}

/// GET /org/{name}/projects
pub async fn list_org_projects(
    State(state): State<SharedState>,
    Path(org_name): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, MockError> {
    list(state, OwnerType::Org, &org_name, &pairs).await
}

async fn create(
    state: SharedState,
    owner_type: OwnerType,
    owner_name: &str,
    req: CreateProjectRequest,
) -> Result<impl IntoResponse, MockError> {
    let mut state = state.write().await;
    let project = state.create_project(owner_type, owner_name, req)?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /user/projects
pub async fn create_current_user_project(
    State(state): State<SharedState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, MockError> {
    create(state, OwnerType::User, "", req).await
}

/// PUT /user/{name}/projects
pub async fn create_user_project(
    State(state): State<SharedState>,
    Path(user_name): Path<String>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, MockError> {
    create(state, OwnerType::User, &user_name, req).await
}

/// PUT /org/{name}/projects
pub async fn create_org_project(
    State(state): State<SharedState>,
    Path(org_name): Path<String>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, MockError> {
    create(state, OwnerType::Org, &org_name, req).await
}

fn owner_type(kind: &str) -> Result<OwnerType, MockError> {
    match kind {
        "user" => Ok(OwnerType::User),
        "org" => Ok(OwnerType::Org),
        other => Err(MockError::BadRequest(format!("invalid owner type {other:?}"))),
    }
}

/// DELETE /projects/{kind}/{project}, owned by the authenticated user.
pub async fn delete_current_user_project(
    State(state): State<SharedState>,
    Path((kind, project_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, MockError> {
    let owner_type = owner_type(&kind)?;
    state
        .write()
        .await
        .delete_project(owner_type, "", &project_name)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /projects/{kind}/{owner}/{project}
pub async fn delete_project(
    State(state): State<SharedState>,
    Path((kind, owner_name, project_name)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, MockError> {
    let owner_type = owner_type(&kind)?;
    state
        .write()
        .await
        .delete_project(owner_type, &owner_name, &project_name)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /projects/{ref}/reconfig
pub async fn reconfig_project(
    State(state): State<SharedState>,
    Path(project_ref): Path<String>,
) -> Result<impl IntoResponse, MockError> {
    let state = state.read().await;
    match state.get_project(&project_ref) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(MockError::NotFound(format!("project {project_ref} not found"))),
    }
}
