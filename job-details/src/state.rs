use std::sync::Arc;

use common::db::JobDetailsStore;

pub const SERVICE: &str = "job-details";
pub const DISPLAY_NAME: &str = "Employee Yearly Job Details";
pub const PREFIX: &str = "/api/v1/employee-yearly-job-details";

#[derive(Clone)]
pub struct AppState {
    pub job_details: Arc<dyn JobDetailsStore>,
}

impl AppState {
    pub fn new(job_details: Arc<dyn JobDetailsStore>) -> Self {
        Self { job_details }
    }
}
