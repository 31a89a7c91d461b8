use std::sync::Arc;

use common::db::Repository;
use common::models::Employee;

pub const SERVICE: &str = "employees";
pub const DISPLAY_NAME: &str = "Employee";
pub const PREFIX: &str = "/api/v1/employees";

#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<dyn Repository<Employee>>,
}

impl AppState {
    pub fn new(employees: Arc<dyn Repository<Employee>>) -> Self {
        Self { employees }
    }
}
