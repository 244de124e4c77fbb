//! User endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{PageQuery, SharedState};
use crate::mock_server::state::MockError;
use crate::{CreateUserLaRequest, CreateUserRequest, CreateUserTokenRequest, CreateUserTokenResponse};

/// GET /user/{id}
pub async fn get_user(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, MockError> {
    let state = state.read().await;
    state
        .get_user(&user_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| MockError::NotFound(format!("user {user_id} not found")))
}

/// GET /users
pub async fn list_users(
    State(state): State<SharedState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, MockError> {
    let page = PageQuery::from_pairs(&pairs)?;
    let state = state.read().await;
    Ok(Json(page.apply(state.list_users())))
}

/// PUT /users
pub async fn create_user(
    State(state): State<SharedState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, MockError> {
    let user = state.write().await.create_user(&req.user_name)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// DELETE /users/{name}
pub async fn delete_user(
    State(state): State<SharedState>,
    Path(user_name): Path<String>,
) -> Result<impl IntoResponse, MockError> {
    state.write().await.delete_user(&user_name)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /users/{name}/linkedaccounts
pub async fn create_linked_account(
    State(state): State<SharedState>,
    Path(user_name): Path<String>,
    Json(req): Json<CreateUserLaRequest>,
) -> Result<impl IntoResponse, MockError> {
    let resp = state
        .write()
        .await
        .create_linked_account(&user_name, req)?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// DELETE /users/{name}/linkedaccounts/{id}
pub async fn delete_linked_account(
    State(state): State<SharedState>,
    Path((user_name, la_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, MockError> {
    state
        .write()
        .await
        .delete_linked_account(&user_name, &la_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /users/{name}/tokens
pub async fn create_token(
    State(state): State<SharedState>,
    Path(user_name): Path<String>,
    Json(req): Json<CreateUserTokenRequest>,
) -> Result<impl IntoResponse, MockError> {
    let token = state
        .write()
        .await
        .create_token(&user_name, &req.token_name)?;
    Ok((StatusCode::CREATED, Json(CreateUserTokenResponse { token })))
}
