use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use common::auth::{DatabaseAuthService, TokenPair};
use common::bulk::{self, BulkResponse};
use common::errors::ApiError;
use common::health;
use common::models::{UserProfile, UserProfileInput};
use common::pagination::{self, PageRequest};
use common::response::ApiResponse;
use common::validation::ValidJson;

use crate::state::{AppState, DISPLAY_NAME};

pub const LOGIN_SUCCESS: &str = "Login successful [AUTH_200_OK]";
pub const REFRESH_SUCCESS: &str = "Token refreshed [AUTH_200_OK]";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserList {
    #[validate(length(min = 1, message = "User profile list cannot be empty"))]
    #[validate]
    pub user_profile_list: Vec<UserProfileInput>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserKeyList {
    #[validate(length(min = 1, message = "User profile list cannot be empty"))]
    pub user_profile_list: Vec<UserKey>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserKey {
    pub user_id: i64,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(alias = "userName", default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Replace plain-text passwords with bcrypt hashes.
fn hash_profiles(
    auth: &DatabaseAuthService,
    inputs: Vec<UserProfileInput>,
) -> Result<Vec<UserProfile>, ApiError> {
    inputs
        .into_iter()
        .map(|input| {
            let hash = auth
                .hash_password(&input.password)
                .map_err(|e| ApiError::internal(e.to_string()))?;
            Ok(input.into_profile(hash))
        })
        .collect()
}

pub async fn test_connection() -> ApiResponse<()> {
    health::application_up(DISPLAY_NAME)
}

pub async fn test_database_connection(State(state): State<AppState>) -> ApiResponse<()> {
    health::database_status::<UserProfile, _>(DISPLAY_NAME, state.users.as_ref()).await
}

#[tracing::instrument(skip(state))]
pub async fn fetch_users(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<ApiResponse<Vec<UserProfile>>, ApiError> {
    pagination::fetch_page::<UserProfile, _>(state.users.as_ref(), page).await
}

#[tracing::instrument(skip(state, body))]
pub async fn add_users(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<UserList>,
) -> Result<ApiResponse<BulkResponse<UserProfile>>, ApiError> {
    let profiles = hash_profiles(&state.auth, body.user_profile_list)?;
    bulk::add_all(state.users.as_ref(), profiles).await
}

#[tracing::instrument(skip(state))]
pub async fn search_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<ApiResponse<BulkResponse<UserProfile>>, ApiError> {
    bulk::search::<UserProfile, _>(state.users.as_ref(), user_id).await
}

#[tracing::instrument(skip(state, body))]
pub async fn update_users(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<UserList>,
) -> Result<ApiResponse<BulkResponse<UserProfile>>, ApiError> {
    let profiles = hash_profiles(&state.auth, body.user_profile_list)?;
    bulk::update_all(state.users.as_ref(), profiles).await
}

#[tracing::instrument(skip(state, body))]
pub async fn delete_users(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<UserKeyList>,
) -> Result<ApiResponse<BulkResponse<UserProfile>>, ApiError> {
    let ids = body.user_profile_list.into_iter().map(|key| key.user_id).collect();
    bulk::delete_all::<UserProfile, _>(state.users.as_ref(), ids).await
}

#[tracing::instrument(skip(state, body), fields(username = %body.username))]
pub async fn authenticate(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> Result<ApiResponse<TokenPair>, ApiError> {
    info!("Authentication attempt");
    let pair = state.auth.authenticate(&body.username, &body.password).await?;
    Ok(ApiResponse::success(LOGIN_SUCCESS, pair))
}

#[tracing::instrument(skip(state, body))]
pub async fn refresh(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RefreshRequest>,
) -> Result<ApiResponse<TokenPair>, ApiError> {
    let pair = state.auth.refresh(&body.refresh_token).await?;
    Ok(ApiResponse::success(REFRESH_SUCCESS, pair))
}
