use axum::{
    routing::{delete, get, post, put},
    Router,
};

use common::bootstrap;
use common::config::Settings;
use common::middleware::AccessPolicy;

use crate::handlers;
use crate::state::{AppState, PREFIX, SERVICE};

/// Create the department router with the shared middleware stack
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let routes = Router::new()
        .route("/testConnection", get(handlers::test_connection))
        .route(
            "/testDataBaseConnection",
            get(handlers::test_database_connection),
        )
        .route("/fetchDepartments", get(handlers::fetch_departments))
        .route("/addDepartments", post(handlers::add_departments))
        .route("/searchDepartment/:id", get(handlers::search_department))
        .route("/updateDepartments", put(handlers::update_departments))
        .route("/deleteDepartments", delete(handlers::delete_departments))
        .with_state(state);

    bootstrap::apply_layers(
        Router::new().nest(PREFIX, routes),
        settings,
        SERVICE,
        AccessPolicy::for_service(PREFIX),
    )
}
