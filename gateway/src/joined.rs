// Joined employee and project lookup across two services

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use validator::Validate;

use common::response::ApiResponse;
use common::validation::ValidJson;

use crate::error::GatewayError;
use crate::state::GatewayState;

pub const COMBINED_MESSAGE: &str = "Combined response";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinedQuery {
    #[validate(range(min = 0, message = "Employee ID must be positive or zero"))]
    pub employee_id: i64,
    #[validate(range(min = 0, message = "Project ID must be positive or zero"))]
    pub project_id: i64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct JoinedDetails {
    pub employee: Value,
    pub project: Value,
}

/// GET `url` with the caller's Authorization header and return the envelope's `data`.
async fn fetch_data(
    client: &reqwest::Client,
    url: &str,
    authorization: Option<&HeaderValue>,
) -> Result<Value, GatewayError> {
    let mut request = client.get(url);
    if let Some(value) = authorization {
        request = request.header(header::AUTHORIZATION, value.clone());
    }

    let response = request.send().await?.error_for_status()?;
    let envelope: ApiResponse<Value> = response.json().await?;
    Ok(envelope.data.unwrap_or(Value::Null))
}

#[instrument(skip(state, headers))]
pub async fn search_employee_data_details(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    ValidJson(query): ValidJson<JoinedQuery>,
) -> Result<ApiResponse<JoinedDetails>, GatewayError> {
    let authorization = headers.get(header::AUTHORIZATION);
    let employee_url = format!(
        "{}/api/v1/employees/{}",
        state.employee_service_url, query.employee_id
    );
    let project_url = format!(
        "{}/api/v1/project/searchProject/{}",
        state.project_service_url, query.project_id
    );

    let (employee, project) = tokio::join!(
        fetch_data(&state.client, &employee_url, authorization),
        fetch_data(&state.client, &project_url, authorization),
    );

    let details = JoinedDetails {
        employee: employee?,
        project: project?,
    };
    info!(
        employee_id = query.employee_id,
        project_id = query.project_id,
        "Combined employee and project details"
    );
    Ok(ApiResponse::success(COMBINED_MESSAGE, details))
}
