use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use common::bulk::{self, BulkResponse};
use common::errors::ApiError;
use common::health;
use common::models::Project;
use common::pagination::{self, PageRequest};
use common::response::ApiResponse;
use common::validation::ValidJson;

use crate::state::{AppState, DISPLAY_NAME};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectList {
    #[validate(length(min = 1, message = "Project list cannot be empty"))]
    #[validate]
    pub prj_details_list: Vec<Project>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectKeyList {
    #[validate(length(min = 1, message = "Project list cannot be empty"))]
    pub prj_details_list: Vec<ProjectKey>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectKey {
    pub project_id: i64,
}

pub async fn test_connection() -> ApiResponse<()> {
    health::application_up(DISPLAY_NAME)
}

pub async fn test_database_connection(State(state): State<AppState>) -> ApiResponse<()> {
    health::database_status::<Project, _>(DISPLAY_NAME, state.projects.as_ref()).await
}

#[tracing::instrument(skip(state))]
pub async fn fetch_projects(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<ApiResponse<Vec<Project>>, ApiError> {
    pagination::fetch_page::<Project, _>(state.projects.as_ref(), page).await
}

#[tracing::instrument(skip(state, body))]
pub async fn add_projects(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<ProjectList>,
) -> Result<ApiResponse<BulkResponse<Project>>, ApiError> {
    bulk::add_all(state.projects.as_ref(), body.prj_details_list).await
}

#[tracing::instrument(skip(state))]
pub async fn search_project(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> Result<ApiResponse<BulkResponse<Project>>, ApiError> {
    bulk::search::<Project, _>(state.projects.as_ref(), project_id).await
}

#[tracing::instrument(skip(state, body))]
pub async fn update_projects(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<ProjectList>,
) -> Result<ApiResponse<BulkResponse<Project>>, ApiError> {
    bulk::update_all(state.projects.as_ref(), body.prj_details_list).await
}

#[tracing::instrument(skip(state, body))]
pub async fn delete_projects(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<ProjectKeyList>,
) -> Result<ApiResponse<BulkResponse<Project>>, ApiError> {
    let ids = body
        .prj_details_list
        .into_iter()
        .map(|key| key.project_id)
        .collect();
    bulk::delete_all::<Project, _>(state.projects.as_ref(), ids).await
}
