use std::sync::Arc;

use common::db::Repository;
use common::models::Department;

pub const SERVICE: &str = "departments";
/// Name used in connection probe messages
pub const DISPLAY_NAME: &str = "Department";
pub const PREFIX: &str = "/api/v1/department";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub departments: Arc<dyn Repository<Department>>,
}

impl AppState {
    pub fn new(departments: Arc<dyn Repository<Department>>) -> Self {
        Self { departments }
    }
}
