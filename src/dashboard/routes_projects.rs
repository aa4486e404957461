//! Project registry API: list, filter, point lookup, create, update, delete.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::AppState;
use crate::error::RegistryError;
use crate::project::{NewProject, ProgressUpdate};

/// GET /: every project in insertion order.
pub(super) async fn handler_projects_list(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, RegistryError> {
    let projects = state.store.list_all().await?;
    Ok(Json(projects))
}

#[derive(Deserialize)]
pub(super) struct TeamQuery {
    engineer: Option<String>,
}

/// GET /team/{team}?engineer=..: case-insensitive filter, empty list when
/// nothing matches.
pub(super) async fn handler_projects_by_team(
    State(state): State<Arc<AppState>>,
    ApiPath(team): ApiPath<String>,
    ApiQuery(params): ApiQuery<TeamQuery>,
) -> Result<impl IntoResponse, RegistryError> {
    let projects = match params.engineer.as_deref() {
        Some(engineer) => {
            state
                .store
                .list_by_team_and_engineer(&team, engineer)
                .await?
        }
        None => state.store.list_by_team(&team).await?,
    };
    Ok(Json(projects))
}

/// GET /id/{project_id}
pub(super) async fn handler_project_get_by_id(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<i64>,
) -> Result<impl IntoResponse, RegistryError> {
    let project = state.store.get_by_id(project_id).await?;
    Ok(Json(project))
}

/// GET /number/{project_number}: exact, case-sensitive.
pub(super) async fn handler_project_get_by_number(
    State(state): State<Arc<AppState>>,
    ApiPath(project_number): ApiPath<String>,
) -> Result<impl IntoResponse, RegistryError> {
    let project = state.store.get_by_number(&project_number).await?;
    Ok(Json(project))
}

/// POST /create-project: 201 with the stored record, including its new id.
pub(super) async fn handler_project_create(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewProject>,
) -> Result<impl IntoResponse, RegistryError> {
    let result = state.store.create(payload).await;
    state.observe_mutation("create", &result).await;
    Ok((StatusCode::CREATED, Json(result?)))
}

/// PUT /update-progress
pub(super) async fn handler_project_update_progress(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<ProgressUpdate>,
) -> Result<StatusCode, RegistryError> {
    let result = state.store.update_progress(&payload).await;
    state.observe_mutation("update_progress", &result).await;
    result?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /delete-project/{project_number}: first case-insensitive match.
pub(super) async fn handler_project_delete_by_number(
    State(state): State<Arc<AppState>>,
    ApiPath(project_number): ApiPath<String>,
) -> Result<StatusCode, RegistryError> {
    let result = state.store.delete_by_number(&project_number).await;
    state.observe_mutation("delete", &result).await;
    result?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /id/{project_id}
pub(super) async fn handler_project_delete_by_id(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<i64>,
) -> Result<StatusCode, RegistryError> {
    let result = state.store.delete_by_id(project_id).await;
    state.observe_mutation("delete", &result).await;
    result?;
    Ok(StatusCode::NO_CONTENT)
}
