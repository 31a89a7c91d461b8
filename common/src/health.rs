// Connection probes exposed by every service

use tracing::{info, warn};

use crate::db::repository::{Record, Repository};
use crate::response::ApiResponse;

pub fn application_message(service: &str) -> String {
    format!("Connection to {} Application is successfully established.", service)
}

pub fn application_up(service: &str) -> ApiResponse<()> {
    ApiResponse::success_message(application_message(service))
}

/// Probe the store behind `service`.
///
/// A failed probe is still answered with 200 and an `error` envelope.
pub async fn database_status<R, S>(service: &str, store: &S) -> ApiResponse<()>
where
    R: Record,
    S: Repository<R> + ?Sized,
{
    match store.ping().await {
        Ok(()) => {
            info!(service = service, "Database connection check passed");
            ApiResponse::success_message(format!(
                "Connection from {svc} Application to {svc} Database successfully established.",
                svc = service
            ))
        }
        Err(err) => {
            warn!(service = service, error = %err, "Database connection check failed");
            ApiResponse::error(format!(
                "Connection to {} Database failed to be established.",
                service
            ))
        }
    }
}
