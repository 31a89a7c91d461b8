use axum::extract::{Path, Query, State};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use common::bulk::OperationSummary;
use common::errors::ApiError;
use common::health;
use common::models::{Employee, EmployeeUpdate};
use common::pagination::{self, PageRequest};
use common::response::ApiResponse;
use common::validation::ValidJson;

use crate::batch;
use crate::state::{AppState, DISPLAY_NAME};

pub const MAX_BATCH_DELETE: usize = 500;

/// Bare JSON array of employees to create
#[derive(Debug, Deserialize, Validate)]
#[serde(transparent)]
pub struct NewEmployees {
    #[validate(length(min = 1, message = "Employee list cannot be empty"))]
    #[validate]
    pub employees: Vec<Employee>,
}

/// Bare JSON array of partial updates
#[derive(Debug, Deserialize, Validate)]
#[serde(transparent)]
pub struct EmployeeUpdates {
    #[validate(length(min = 1, message = "Employee list cannot be empty"))]
    #[validate]
    pub employees: Vec<EmployeeUpdate>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchDelete {
    #[validate(custom = "batch_delete_size")]
    pub employee_ids: Vec<i64>,
}

fn batch_delete_size(ids: &[i64]) -> Result<(), ValidationError> {
    let message = if ids.is_empty() {
        "List of Employee Ids cannot be empty"
    } else if ids.len() > MAX_BATCH_DELETE {
        "Maximum 500 IDs allowed per request to prevent overload"
    } else {
        return Ok(());
    };
    let mut err = ValidationError::new("length");
    err.message = Some(message.into());
    Err(err)
}

fn summary_message(action: &str, summary: &OperationSummary) -> String {
    format!(
        "{} Success : {} . {} Failed : {}",
        action, summary.success_count, action, summary.error_count
    )
}

pub async fn test_connection() -> ApiResponse<()> {
    health::application_up(DISPLAY_NAME)
}

pub async fn test_database_connection(State(state): State<AppState>) -> ApiResponse<()> {
    health::database_status::<Employee, _>(DISPLAY_NAME, state.employees.as_ref()).await
}

#[tracing::instrument(skip(state))]
pub async fn count_employees(State(state): State<AppState>) -> Result<ApiResponse<i64>, ApiError> {
    let total = state.employees.count().await?;
    Ok(ApiResponse::success(
        format!("Total {} data records: {}", DISPLAY_NAME, total),
        total,
    ))
}

#[tracing::instrument(skip(state))]
pub async fn find_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
) -> Result<ApiResponse<Employee>, ApiError> {
    let employee = state
        .employees
        .find(employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("employeeId {} not found", employee_id)))?;

    Ok(ApiResponse::success(
        format!("Successfully found Employee Id {} data records", employee_id),
        employee,
    ))
}

#[tracing::instrument(skip(state))]
pub async fn fetch_employees(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<ApiResponse<Vec<Employee>>, ApiError> {
    pagination::fetch_page::<Employee, _>(state.employees.as_ref(), page).await
}

#[tracing::instrument(skip(state, body))]
pub async fn add_employees(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<NewEmployees>,
) -> Result<ApiResponse<OperationSummary>, ApiError> {
    let summary = batch::add(state.employees.as_ref(), body.employees).await?;
    Ok(ApiResponse::success(summary_message("Add", &summary), summary))
}

#[tracing::instrument(skip(state, body))]
pub async fn update_employees(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<EmployeeUpdates>,
) -> Result<ApiResponse<OperationSummary>, ApiError> {
    let summary = batch::update(state.employees.as_ref(), body.employees).await?;
    Ok(ApiResponse::success(summary_message("Update", &summary), summary))
}

#[tracing::instrument(skip(state, body))]
pub async fn delete_employees(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<BatchDelete>,
) -> Result<ApiResponse<OperationSummary>, ApiError> {
    let summary = batch::delete(state.employees.as_ref(), body.employee_ids).await?;
    Ok(ApiResponse::success(summary_message("Delete", &summary), summary))
}
