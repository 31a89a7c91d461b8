use axum::{
    routing::{get, post},
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
        .route("/countTotal", get(handlers::count_employees))
        .route(
            "/",
            get(handlers::fetch_employees)
                .post(handlers::add_employees)
                .patch(handlers::update_employees),
        )
        .route("/batch-delete", post(handlers::delete_employees))
        .route("/:employee_id", get(handlers::find_employee))
        .with_state(state);

    bootstrap::apply_layers(
        Router::new().nest(PREFIX, routes),
        settings,
        SERVICE,
        AccessPolicy::for_service(PREFIX),
    )
}
