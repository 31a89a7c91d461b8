use std::sync::Arc;

use common::db::Repository;
use common::models::Project;

pub const SERVICE: &str = "projects";
pub const DISPLAY_NAME: &str = "Project";
pub const PREFIX: &str = "/api/v1/project";

#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<dyn Repository<Project>>,
}

impl AppState {
    pub fn new(projects: Arc<dyn Repository<Project>>) -> Self {
        Self { projects }
    }
}
