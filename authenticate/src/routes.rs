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
        .route("/fetchUsers", get(handlers::fetch_users))
        .route("/addUsers", post(handlers::add_users))
        .route("/searchUser/:id", get(handlers::search_user))
        .route("/updateUsers", put(handlers::update_users))
        .route("/deleteUsers", delete(handlers::delete_users))
        .route("/authenticate", post(handlers::authenticate))
        .route("/refresh", post(handlers::refresh))
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
    use common::auth::{DatabaseAuthService, JwtService, Role, TokenType};
    use common::db::MemoryRepository;
    use common::models::UserProfile;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        store: Arc<MemoryRepository<UserProfile>>,
        jwt: JwtService,
    }

    impl TestApp {
        fn new() -> Self {
            let settings = Settings::defaults_for(SERVICE);
            let jwt = JwtService::from_config(&settings.auth);
            let store = Arc::new(MemoryRepository::<UserProfile>::new());
            let auth = DatabaseAuthService::new(jwt.clone(), store.clone()).with_bcrypt_cost(4);
            let router = create_router(AppState::new(store.clone(), auth), &settings);
            Self { router, store, jwt }
        }

        async fn send(
            &self,
            method: Method,
            path: &str,
            bearer: Option<String>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder()
                .method(method)
                .uri(format!("{}{}", PREFIX, path));
            if let Some(token) = bearer {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let body = match body {
                Some(json) => {
                    builder = builder.header(header::CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };

            let response = self
                .router
                .clone()
                .oneshot(builder.body(body).unwrap())
                .await
                .unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
        }

        fn admin_token(&self) -> Option<String> {
            Some(self.jwt.issue("root", &[Role::Admin], TokenType::Access).unwrap())
        }

        async fn register(&self, id: i64, name: &str, password: &str, role: &str) -> Value {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/addUsers",
                    None,
                    Some(json!({"userProfileList": [{
                        "userId": id,
                        "userName": name,
                        "password": password,
                        "role": role
                    }]})),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            body
        }
    }

    #[tokio::test]
    async fn test_add_users_is_public_and_hashes() {
        let app = TestApp::new();

        let body = app.register(1, "alice", "s3cretPass", "admin").await;
        assert_eq!(body["message"], "Successfully added 1 . Add failed : 0");

        let stored = app.store.snapshot().await;
        assert_eq!(stored[0].user_name, "alice");
        assert_ne!(stored[0].password_hash, "s3cretPass");
        assert!(bcrypt::verify("s3cretPass", &stored[0].password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_login_and_refresh() {
        let app = TestApp::new();
        app.register(1, "alice", "s3cretPass", "user").await;

        let (status, body) = app
            .send(
                Method::POST,
                "/authenticate",
                None,
                Some(json!({"username": "alice", "password": "s3cretPass"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful [AUTH_200_OK]");

        let access = body["data"]["token"].as_str().unwrap().to_string();
        let refresh_token = body["data"]["refreshToken"].as_str().unwrap().to_string();
        let claims = app.jwt.decode_access(&access).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles(), vec![Role::User]);

        let (status, body) = app
            .send(
                Method::POST,
                "/refresh",
                None,
                Some(json!({"refreshToken": refresh_token})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Token refreshed [AUTH_200_OK]");

        let (status, body) = app
            .send(Method::POST, "/refresh", None, Some(json!({"refreshToken": access})))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["message"],
            "Unauthorized: Invalid or expired JWT token [AUTH_401_INVALID_TOKEN]"
        );
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let app = TestApp::new();
        app.register(1, "alice", "s3cretPass", "user").await;

        let (status, body) = app
            .send(
                Method::POST,
                "/authenticate",
                None,
                Some(json!({"userName": "alice", "password": "wrongPass1"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["message"],
            "Unauthorized: Invalid username or password [AUTH_401_INVALID_CREDENTIALS]"
        );
    }

    #[tokio::test]
    async fn test_user_management_requires_admin() {
        let app = TestApp::new();
        app.register(1, "alice", "s3cretPass", "user").await;

        let (status, _) = app.send(Method::GET, "/fetchUsers", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = app
            .send(Method::GET, "/searchUser/1", app.admin_token(), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["userProfileList"][0]["userName"], "alice");
        assert!(body["data"]["userProfileList"][0].get("passwordHash").is_none());

        let (status, body) = app
            .send(
                Method::DELETE,
                "/deleteUsers",
                app.admin_token(),
                Some(json!({"userProfileList": [{"userId": 1}, {"userId": 2}]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Delete Success : 1. Delete Failed : 1");
        assert!(app.store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let app = TestApp::new();
        app.register(1, "alice", "s3cretPass", "user").await;

        let (status, body) = app
            .send(
                Method::PUT,
                "/updateUsers",
                app.admin_token(),
                Some(json!({"userProfileList": [{
                    "userId": 1,
                    "userName": "alice",
                    "password": "n3wPassword",
                    "role": "admin"
                }]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Update Success : 1 . Update Failed : 0");

        let stored = app.store.snapshot().await;
        assert_eq!(stored[0].role, "admin");
        assert!(bcrypt::verify("n3wPassword", &stored[0].password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_add_users_validation() {
        let app = TestApp::new();
        let (status, body) = app
            .send(
                Method::POST,
                "/addUsers",
                None,
                Some(json!({"userProfileList": [{
                    "userId": 3,
                    "userName": "bob",
                    "password": "short",
                    "role": "guest"
                }]})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Validation failed: userProfileList[0].password: Password must be between 8 and 16 characters; userProfileList[0].role: Role must be admin or user; "
        );
    }
}
