// Gateway failures rendered in the response envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use common::response::ApiResponse;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Resource not found: no route for {0}")]
    NoRoute(String),

    #[error("Error: {0}")]
    Upstream(String),

    #[error("Error: invalid request body: {0}")]
    Body(String),

    #[error("Error: failed to build HTTP client: {0}")]
    Client(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NoRoute(_) => StatusCode::NOT_FOUND,
            GatewayError::Body(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream(_) | GatewayError::Client(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Upstream(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Gateway request failed");
        } else {
            warn!(error = %self, "Gateway request rejected");
        }
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}
