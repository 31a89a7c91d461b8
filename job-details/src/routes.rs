use axum::{
    routing::{delete, get, post, put},
    Router,
};

use common::bootstrap;
use common::config::Settings;
use common::middleware::AccessPolicy;

use crate::handlers;
use crate::state::{AppState, PREFIX, SERVICE};

pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let routes = Router::new()
        .route("/testConnection", get(handlers::test_connection))
        .route(
            "/testDataBaseConnection",
            get(handlers::test_database_connection),
        )
        .route("/fetchEmployeeYrJobDetails", get(handlers::fetch_job_details))
        .route("/addEmployeeYrJobDetails", post(handlers::add_job_details))
        .route(
            "/searchEmployeeYrJobDetails",
            get(handlers::search_job_details),
        )
        .route(
            "/updateEmployeeYrJobDetails",
            put(handlers::update_job_details),
        )
        .route(
            "/deleteEmployeeYrJobDetails",
            delete(handlers::delete_job_details),
        )
        .with_state(state);

    bootstrap::apply_layers(
        Router::new().nest(PREFIX, routes),
        settings,
        SERVICE,
        AccessPolicy::for_service(PREFIX),
    )
}
