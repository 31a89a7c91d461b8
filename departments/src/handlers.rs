use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use common::bulk::{self, BulkResponse};
use common::errors::ApiError;
use common::health;
use common::models::Department;
use common::pagination::{self, PageRequest};
use common::response::ApiResponse;
use common::validation::ValidJson;

use crate::state::{AppState, DISPLAY_NAME};

/// `{"departmentDetailList": [...]}` body of add and update
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentList {
    #[validate(length(min = 1, message = "Department list cannot be empty"))]
    #[validate]
    pub department_detail_list: Vec<Department>,
}

/// Delete only needs the keys; other fields are ignored.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentKeyList {
    #[validate(length(min = 1, message = "Department list cannot be empty"))]
    pub department_detail_list: Vec<DepartmentKey>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentKey {
    pub department_id: i64,
}

pub async fn test_connection() -> ApiResponse<()> {
    health::application_up(DISPLAY_NAME)
}

pub async fn test_database_connection(State(state): State<AppState>) -> ApiResponse<()> {
    health::database_status::<Department, _>(DISPLAY_NAME, state.departments.as_ref()).await
}

#[tracing::instrument(skip(state))]
pub async fn fetch_departments(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<ApiResponse<Vec<Department>>, ApiError> {
    pagination::fetch_page::<Department, _>(state.departments.as_ref(), page).await
}

#[tracing::instrument(skip(state, body))]
pub async fn add_departments(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<DepartmentList>,
) -> Result<ApiResponse<BulkResponse<Department>>, ApiError> {
    bulk::add_all(state.departments.as_ref(), body.department_detail_list).await
}

#[tracing::instrument(skip(state))]
pub async fn search_department(
    State(state): State<AppState>,
    Path(department_id): Path<i64>,
) -> Result<ApiResponse<BulkResponse<Department>>, ApiError> {
    bulk::search::<Department, _>(state.departments.as_ref(), department_id).await
}

#[tracing::instrument(skip(state, body))]
pub async fn update_departments(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<DepartmentList>,
) -> Result<ApiResponse<BulkResponse<Department>>, ApiError> {
    bulk::update_all(state.departments.as_ref(), body.department_detail_list).await
}

#[tracing::instrument(skip(state, body))]
pub async fn delete_departments(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<DepartmentKeyList>,
) -> Result<ApiResponse<BulkResponse<Department>>, ApiError> {
    let ids = body
        .department_detail_list
        .into_iter()
        .map(|key| key.department_id)
        .collect();
    bulk::delete_all::<Department, _>(state.departments.as_ref(), ids).await
}
