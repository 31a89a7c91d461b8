// Error handling framework
// Typed errors per layer, rendered to the response envelope through ApiError

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::response::ApiResponse;
use crate::telemetry;

/// Authentication and authorization errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Insufficient permissions: required {0}")]
    InsufficientPermissions(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
}

impl AuthError {
    /// Fixed client-facing message carrying the error code tag.
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => {
                "Unauthorized: Invalid username or password [AUTH_401_INVALID_CREDENTIALS]"
            }
            AuthError::MissingCredentials => {
                "Unauthorized: Authentication required [AUTH_401_NO_CREDENTIALS]"
            }
            AuthError::MissingToken => "Unauthorized: Authentication required [AUTH_401_NO_TOKEN]",
            AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                "Unauthorized: Invalid or expired JWT token [AUTH_401_INVALID_TOKEN]"
            }
            AuthError::InsufficientPermissions(_) => {
                "Forbidden: Insufficient permissions [AUTH_403_INSUFFICIENT_PERMISSIONS]"
            }
            AuthError::AuthenticationFailed(_) => {
                "Unauthorized: Authentication failed [AUTH_401_GENERIC]"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Short label used for the auth failure counter.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::InsufficientPermissions(_) => "insufficient_permissions",
            AuthError::AuthenticationFailed(_) => "authentication_failed",
        }
    }
}

/// One violated field rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Request validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Validation failed: {}", format_violations(.0))]
    Fields(Vec<FieldViolation>),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Page number must be 1 or greater.")]
    PageBelowRange,

    #[error("Current page {0} is bigger than total number of pages available.")]
    PageAboveRange(i64),

    #[error("Page size must be 1 or greater.")]
    InvalidPageSize,
}

impl ValidationError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::Fields(vec![FieldViolation {
            field: field.into(),
            message: message.into(),
        }])
    }
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}; ", v.field, v.message))
        .collect()
}

/// Database-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Database health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate key violation: {0}")]
    DuplicateKey(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

/// Top-level error returned by handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    /// HTTP status and client-facing message.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Auth(err) => (err.status(), err.client_message().to_string()),
            ApiError::Validation(err @ ValidationError::MalformedBody(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Database(DatabaseError::NotFound(what)) => (
                StatusCode::NOT_FOUND,
                format!("Resource not found: {}", what),
            ),
            ApiError::Database(
                DatabaseError::DuplicateKey(detail) | DatabaseError::ForeignKeyViolation(detail),
            ) => (
                StatusCode::BAD_REQUEST,
                format!("Database constraint violation: {}", detail),
            ),
            ApiError::Database(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", err),
            ),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if let ApiError::Auth(err) = &self {
            telemetry::record_auth_failure(err.reason());
        }

        if status.is_server_error() {
            error!(error = %self, status = %status.as_u16(), "Request failed");
        } else {
            warn!(error = %self, status = %status.as_u16(), "Request rejected");
        }

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::Auth(self).into_response()
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => DatabaseError::DuplicateKey(db_err.message().to_string()),
                        "23503" => DatabaseError::ForeignKeyViolation(db_err.message().to_string()),
                        _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                    }
                } else {
                    DatabaseError::QueryFailed(db_err.message().to_string())
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionFailed(err.to_string())
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_concatenates_fields() {
        let err = ValidationError::Fields(vec![
            FieldViolation {
                field: "firstName".to_string(),
                message: "First name cannot be empty".to_string(),
            },
            FieldViolation {
                field: "salary".to_string(),
                message: "Salary must be positive".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: firstName: First name cannot be empty; salary: Salary must be positive; "
        );
    }

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(AuthError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::InsufficientPermissions("ADMIN".to_string()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::TokenExpired.client_message(),
            AuthError::InvalidToken("bad".to_string()).client_message()
        );
    }

    #[test]
    fn test_api_error_mapping() {
        let cases = vec![
            (
                ApiError::from(ValidationError::PageAboveRange(7)),
                StatusCode::BAD_REQUEST,
                "Current page 7 is bigger than total number of pages available.",
            ),
            (
                ApiError::from(ValidationError::MalformedBody("expected value".to_string())),
                StatusCode::UNPROCESSABLE_ENTITY,
                "Malformed request body: expected value",
            ),
            (
                ApiError::not_found("departmentId 3 not found"),
                StatusCode::NOT_FOUND,
                "Resource not found: departmentId 3 not found",
            ),
            (
                ApiError::from(DatabaseError::DuplicateKey("user_name".to_string())),
                StatusCode::BAD_REQUEST,
                "Database constraint violation: user_name",
            ),
            (
                ApiError::internal("disk on fire"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error: disk on fire",
            ),
            (
                ApiError::from(AuthError::AuthenticationFailed("disabled".to_string())),
                StatusCode::UNAUTHORIZED,
                "Unauthorized: Authentication failed [AUTH_401_GENERIC]",
            ),
        ];

        for (err, status, message) in cases {
            let (actual_status, actual_message) = err.status_and_message();
            assert_eq!(actual_status, status);
            assert_eq!(actual_message, message);
        }
    }

    #[test]
    fn test_api_error_into_response_status() {
        let response = ApiError::from(AuthError::MissingToken).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InsufficientPermissions("ADMIN".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
