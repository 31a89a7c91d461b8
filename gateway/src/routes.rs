use axum::{
    routing::{get, post},
    Router,
};

use common::bootstrap;
use common::config::Settings;
use common::middleware::AccessPolicy;

use crate::state::{GatewayState, PREFIX, SERVICE};
use crate::{handlers, joined, proxy};

/// Gateway endpoints plus the proxy fallback for every routed prefix
pub fn create_router(state: GatewayState, settings: &Settings) -> Router {
    let policy = AccessPolicy::gateway(state.routes.prefixes());

    let gateway_routes = Router::new()
        .route("/testConnection", get(handlers::test_connection))
        .route(
            "/searchEmployeeDataDetails",
            post(joined::search_employee_data_details),
        );

    let router = Router::new()
        .nest(PREFIX, gateway_routes)
        .route("/metrics", get(handlers::metrics))
        .fallback(proxy::forward)
        .with_state(state);

    bootstrap::apply_layers(router, settings, SERVICE, policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use common::auth::{JwtService, Role, TokenType};
    use common::config::RouteConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, header as header_eq, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct TestGateway {
        router: Router,
        token: String,
    }

    impl TestGateway {
        fn new(upstream: &str) -> Self {
            let mut settings = Settings::defaults_for(SERVICE);
            settings.gateway.routes = vec![
                RouteConfig {
                    prefix: "/api/v1/employees".to_string(),
                    upstream: upstream.to_string(),
                },
                RouteConfig {
                    prefix: "/api/v1/project".to_string(),
                    upstream: upstream.to_string(),
                },
            ];
            settings.gateway.employee_service_url = upstream.to_string();
            settings.gateway.project_service_url = upstream.to_string();

            let metrics = PrometheusBuilder::new().build_recorder().handle();
            let state = GatewayState::new(&settings.gateway, metrics).unwrap();
            let token = JwtService::from_config(&settings.auth)
                .issue("gateway-user", &[Role::User], TokenType::Access)
                .unwrap();

            Self {
                router: create_router(state, &settings),
                token,
            }
        }

        fn bearer(&self) -> String {
            format!("Bearer {}", self.token)
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
        }
    }

    #[tokio::test]
    async fn test_gateway_probe_is_public() {
        let gateway = TestGateway::new("http://127.0.0.1:9");
        let (status, body) = gateway
            .send(
                Request::get("/api/v1/gateway/testConnection")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "Connection to API Gateway Application is successfully established."
        );
    }

    #[tokio::test]
    async fn test_proxy_forwards_request() {
        let upstream = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/employees"))
            .and(query_param("dryRun", "true"))
            .and(header_eq("x-trace", "abc"))
            .and(body_json(json!([{"employeeId": 3, "salary": 99.5}])))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("x-upstream", "employees")
                    .set_body_json(json!({"status": "success", "message": "Update Success : 1 . Update Failed : 0"})),
            )
            .expect(1)
            .mount(&upstream)
            .await;

        let gateway = TestGateway::new(&upstream.uri());
        let request = Request::builder()
            .method(Method::PATCH)
            .uri("/api/v1/employees?dryRun=true")
            .header(header::AUTHORIZATION, gateway.bearer())
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-trace", "abc")
            .body(Body::from(json!([{"employeeId": 3, "salary": 99.5}]).to_string()))
            .unwrap();

        let response = gateway.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers()["x-upstream"], "employees");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Update Success : 1 . Update Failed : 0");
    }

    #[tokio::test]
    async fn test_proxy_requires_token_except_probes() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/employees/testConnection"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .mount(&upstream)
            .await;

        let gateway = TestGateway::new(&upstream.uri());

        let (status, _) = gateway
            .send(
                Request::get("/api/v1/employees/testConnection")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = gateway
            .send(Request::get("/api/v1/employees/1").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["message"],
            "Unauthorized: Authentication required [AUTH_401_NO_TOKEN]"
        );
    }

    #[tokio::test]
    async fn test_unknown_prefix() {
        let gateway = TestGateway::new("http://127.0.0.1:9");
        let (status, body) = gateway
            .send(
                Request::get("/api/v1/payroll/run")
                    .header(header::AUTHORIZATION, gateway.bearer())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["message"],
            "Resource not found: no route for /api/v1/payroll/run"
        );

        let (status, body) = gateway
            .send(Request::get("/api/v1/payroll/run").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["message"],
            "Resource not found: no route for /api/v1/payroll/run"
        );
    }

    #[tokio::test]
    async fn test_joined_query_combines_both_services() {
        let upstream = MockServer::start().await;
        let gateway = TestGateway::new(&upstream.uri());

        Mock::given(method("GET"))
            .and(path("/api/v1/employees/5"))
            .and(header_eq("authorization", gateway.bearer().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": "Successfully found Employee Id 5 data records",
                "data": {"employeeId": 5, "firstName": "Nila"}
            })))
            .expect(1)
            .mount(&upstream)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/project/searchProject/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": "Successfully found Project Id 9 data records",
                "data": {"prjDetailsList": [{"projectId": 9, "projectName": "Atlas"}]}
            })))
            .expect(1)
            .mount(&upstream)
            .await;

        let (status, body) = gateway
            .send(
                Request::post("/api/v1/gateway/searchEmployeeDataDetails")
                    .header(header::AUTHORIZATION, gateway.bearer())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"employeeId": 5, "projectId": 9}).to_string()))
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Combined response");
        assert_eq!(body["data"]["employee"]["firstName"], "Nila");
        assert_eq!(body["data"]["project"]["prjDetailsList"][0]["projectName"], "Atlas");
    }

    #[tokio::test]
    async fn test_joined_query_fails_when_one_side_fails() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/employees/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"employeeId": 5}
            })))
            .mount(&upstream)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/project/searchProject/9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": "error",
                "message": "Resource not found: projectId 9 not found"
            })))
            .mount(&upstream)
            .await;

        let gateway = TestGateway::new(&upstream.uri());
        let (status, body) = gateway
            .send(
                Request::post("/api/v1/gateway/searchEmployeeDataDetails")
                    .header(header::AUTHORIZATION, gateway.bearer())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"employeeId": 5, "projectId": 9}).to_string()))
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_metrics_is_public() {
        let gateway = TestGateway::new("http://127.0.0.1:9");
        let response = gateway
            .router
            .clone()
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
