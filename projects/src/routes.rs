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
        .route("/fetchProjects", get(handlers::fetch_projects))
        .route("/addProjects", post(handlers::add_projects))
        .route("/searchProject/:id", get(handlers::search_project))
        .route("/updateProjects", put(handlers::update_projects))
        .route("/deleteProjects", delete(handlers::delete_projects))
        .with_state(state);

    bootstrap::apply_layers(
        Router::new().nest(PREFIX, routes),
        settings,
        SERVICE,
        AccessPolicy::for_service(PREFIX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use chrono::{Duration, NaiveDate, Utc};
    use common::auth::{JwtService, Role, TokenType};
    use common::db::MemoryRepository;
    use common::models::Project;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn project(id: i64) -> Project {
        Project {
            project_id: id,
            project_name: format!("Project {}", id),
            start_date: NaiveDate::from_ymd_opt(2022, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            department_id: 2,
        }
    }

    fn setup(records: Vec<Project>) -> (Router, Arc<MemoryRepository<Project>>, JwtService) {
        let settings = Settings::defaults_for(SERVICE);
        let store = Arc::new(MemoryRepository::with_records(records));
        let router = create_router(AppState::new(store.clone()), &settings);
        (router, store, JwtService::from_config(&settings.auth))
    }

    async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn authorized(jwt: &JwtService, role: Role, method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let token = jwt.issue("tester", &[role], TokenType::Access).unwrap();
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json");
        match body {
            Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_connection() {
        let (router, _, _) = setup(vec![]);
        let request = Request::builder()
            .uri("/api/v1/project/testConnection")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "Connection to Project Application is successfully established."
        );
    }

    #[tokio::test]
    async fn test_database_connection() {
        let (router, _, _) = setup(vec![]);
        let request = Request::builder()
            .uri("/api/v1/project/testDataBaseConnection")
            .body(Body::empty())
            .unwrap();
        let (_, body) = call(&router, request).await;
        assert_eq!(
            body["message"],
            "Connection from Project Application to Project Database successfully established."
        );
    }

    #[tokio::test]
    async fn test_search_project() {
        let (router, _, jwt) = setup(vec![project(5)]);

        let (status, body) = call(
            &router,
            authorized(&jwt, Role::User, Method::GET, "/api/v1/project/searchProject/5", None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Successfully found Project Id 5 data records");
        assert_eq!(body["data"]["prjDetailsList"][0]["startDate"], "2022-04-01");

        let (status, _) = call(
            &router,
            authorized(&jwt, Role::User, Method::GET, "/api/v1/project/searchProject/6", None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_rejects_future_start_date() {
        let (router, store, jwt) = setup(vec![]);
        let tomorrow = Utc::now().date_naive() + Duration::days(1);
        let body = json!({"prjDetailsList": [{
            "projectId": 1,
            "projectName": "Apollo",
            "startDate": tomorrow.to_string(),
            "endDate": "2030-01-01",
            "departmentId": 1
        }]});

        let (status, body) = call(
            &router,
            authorized(&jwt, Role::Admin, Method::POST, "/api/v1/project/addProjects", Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Validation failed: prjDetailsList[0].startDate: Start Date must be in the past; "
        );
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_update_delete_cycle() {
        let (router, store, jwt) = setup(vec![]);
        let record = |name: &str| {
            json!({"prjDetailsList": [{
                "projectId": 1,
                "projectName": name,
                "startDate": "2021-01-01",
                "endDate": "2030-01-01",
                "departmentId": 1
            }]})
        };

        let (_, body) = call(
            &router,
            authorized(&jwt, Role::Admin, Method::POST, "/api/v1/project/addProjects", Some(record("Apollo"))),
        )
        .await;
        assert_eq!(body["message"], "Successfully added 1 . Add failed : 0");

        let (_, body) = call(
            &router,
            authorized(&jwt, Role::Admin, Method::PUT, "/api/v1/project/updateProjects", Some(record("Gemini"))),
        )
        .await;
        assert_eq!(body["message"], "Update Success : 1 . Update Failed : 0");
        assert_eq!(store.snapshot().await[0].project_name, "Gemini");

        let (_, body) = call(
            &router,
            authorized(
                &jwt,
                Role::Admin,
                Method::DELETE,
                "/api/v1/project/deleteProjects",
                Some(json!({"prjDetailsList": [{"projectId": 1}]})),
            ),
        )
        .await;
        assert_eq!(body["message"], "Delete Success : 1. Delete Failed : 0");
        assert_eq!(
            body["data"]["apiResponse"][0]["message"],
            "Successfully deleted project Id 1 data records"
        );
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_user_cannot_delete() {
        let (router, store, jwt) = setup(vec![project(1)]);
        let (status, _) = call(
            &router,
            authorized(
                &jwt,
                Role::User,
                Method::DELETE,
                "/api/v1/project/deleteProjects",
                Some(json!({"prjDetailsList": [{"projectId": 1}]})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(store.snapshot().await.len(), 1);
    }
}
