use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use common::bulk::{self, BulkResponse};
use common::db::JobDetailsFilter;
use common::errors::{ApiError, ValidationError};
use common::health;
use common::models::{EmployeeYearlyJobDetails, JobDetailsKey};
use common::pagination::{self, PageRequest};
use common::response::ApiResponse;
use common::validation::ValidJson;

use crate::state::{AppState, DISPLAY_NAME};

type Details = EmployeeYearlyJobDetails;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailsList {
    #[validate(length(min = 1, message = "Employee yearly job details list cannot be empty"))]
    #[validate]
    pub employee_yr_job_details_list: Vec<Details>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailsKeyList {
    #[validate(length(min = 1, message = "Employee yearly job details list cannot be empty"))]
    pub employee_yr_job_details_list: Vec<JobDetailsKey>,
}

/// `?searchFor=employeeId|year|both&employeeId=..&year=..`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search_for: Option<String>,
    pub employee_id: Option<i64>,
    pub year: Option<i32>,
}

impl SearchParams {
    pub fn filter(&self) -> Result<JobDetailsFilter, ValidationError> {
        let employee_id = || {
            self.employee_id
                .ok_or_else(|| ValidationError::field("employeeId", "must not be null"))
        };
        let year = || {
            self.year
                .ok_or_else(|| ValidationError::field("year", "must not be null"))
        };

        match self.search_for.as_deref() {
            Some("employeeId") => Ok(JobDetailsFilter::Employee(employee_id()?)),
            Some("year") => Ok(JobDetailsFilter::Year(year()?)),
            Some("both") => Ok(JobDetailsFilter::Both {
                employee_id: employee_id()?,
                year: year()?,
            }),
            _ => Err(ValidationError::field(
                "searchFor",
                "must be one of employeeId, year, both",
            )),
        }
    }
}

fn describe(filter: &JobDetailsFilter) -> String {
    match filter {
        JobDetailsFilter::Employee(employee_id) => format!("employeeId {}", employee_id),
        JobDetailsFilter::Year(year) => format!("year {}", year),
        JobDetailsFilter::Both { employee_id, year } => {
            format!("employeeId {} and year {}", employee_id, year)
        }
    }
}

pub async fn test_connection() -> ApiResponse<()> {
    health::application_up(DISPLAY_NAME)
}

pub async fn test_database_connection(State(state): State<AppState>) -> ApiResponse<()> {
    health::database_status::<Details, _>(DISPLAY_NAME, state.job_details.as_ref()).await
}

#[tracing::instrument(skip(state))]
pub async fn fetch_job_details(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<ApiResponse<Vec<Details>>, ApiError> {
    pagination::fetch_page::<Details, _>(state.job_details.as_ref(), page).await
}

#[tracing::instrument(skip(state, body))]
pub async fn add_job_details(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<JobDetailsList>,
) -> Result<ApiResponse<BulkResponse<Details>>, ApiError> {
    bulk::add_all(state.job_details.as_ref(), body.employee_yr_job_details_list).await
}

/// Records matching the filter, ordered by employee and year; 404 when none match.
#[tracing::instrument(skip(state))]
pub async fn search_job_details(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<ApiResponse<BulkResponse<Details>>, ApiError> {
    let filter = params.filter()?;
    let records = state.job_details.search(filter).await?;

    if records.is_empty() {
        return Err(ApiError::not_found(format!(
            "no employee yearly job details for {}",
            describe(&filter)
        )));
    }

    info!(found = records.len(), "Job details search matched");
    Ok(ApiResponse::success(
        format!(
            "Successfully found {} {} data records",
            records.len(),
            DISPLAY_NAME
        ),
        BulkResponse::records(records),
    ))
}

#[tracing::instrument(skip(state, body))]
pub async fn update_job_details(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<JobDetailsList>,
) -> Result<ApiResponse<BulkResponse<Details>>, ApiError> {
    bulk::update_all(state.job_details.as_ref(), body.employee_yr_job_details_list).await
}

#[tracing::instrument(skip(state, body))]
pub async fn delete_job_details(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<JobDetailsKeyList>,
) -> Result<ApiResponse<BulkResponse<Details>>, ApiError> {
    bulk::delete_all::<Details, _>(state.job_details.as_ref(), body.employee_yr_job_details_list)
        .await
}
