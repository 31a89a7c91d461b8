// Authentication and JWT token handling

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::config::AuthConfig;
use crate::db::repository::UserStore;
use crate::errors::AuthError;
use crate::models::UserProfile;

/// Application role carried in tokens as `ROLE_<NAME>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn authority(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::User => "ROLE_USER",
        }
    }

    /// Accepts `admin`, `ADMIN`, `ROLE_ADMIN`, `role_admin` and the same for user.
    pub fn parse(value: &str) -> Option<Role> {
        let value = value.trim();
        let name = match value.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("ROLE_") => &value[5..],
            _ => value,
        };
        if name.eq_ignore_ascii_case("admin") {
            Some(Role::Admin)
        } else if name.eq_ignore_ascii_case("user") {
            Some(Role::User)
        } else {
            None
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::User => write!(f, "USER"),
        }
    }
}

/// One entry of the `roles` claim: a bare string or a `{"authority": ...}` object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleClaim {
    Name(String),
    Authority { authority: String },
}

impl RoleClaim {
    pub fn as_str(&self) -> &str {
        match self {
            RoleClaim::Name(name) => name,
            RoleClaim::Authority { authority } => authority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    #[default]
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<RoleClaim>,
    /// Tokens minted elsewhere carry no type and count as access tokens
    #[serde(default)]
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Known roles, sorted and deduplicated; unknown authorities are dropped.
    pub fn roles(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = self
            .roles
            .iter()
            .filter_map(|claim| Role::parse(claim.as_str()))
            .collect();
        roles.sort();
        roles.dedup();
        roles
    }
}

/// Access and refresh token returned on login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// JWT token service for encoding and decoding tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    access_hours: i64,
    refresh_hours: i64,
}

impl JwtService {
    #[instrument(skip(secret))]
    pub fn new(secret: &str, access_hours: u64, refresh_hours: u64) -> Self {
        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            access_hours: access_hours as i64,
            refresh_hours: refresh_hours as i64,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
            config.refresh_expiration_hours,
        )
    }

    /// Sign a token of the given type for `username`.
    #[instrument(skip(self, roles))]
    pub fn issue(
        &self,
        username: &str,
        roles: &[Role],
        token_type: TokenType,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let hours = match token_type {
            TokenType::Access => self.access_hours,
            TokenType::Refresh => self.refresh_hours,
        };

        let claims = Claims {
            sub: username.to_string(),
            roles: roles
                .iter()
                .map(|r| RoleClaim::Name(r.authority().to_string()))
                .collect(),
            token_type,
            iat: now.timestamp(),
            exp: (now + Duration::hours(hours)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "Failed to encode JWT token");
            AuthError::AuthenticationFailed(format!("Failed to encode token: {}", e))
        })
    }

    pub fn issue_pair(&self, username: &str, roles: &[Role]) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            token: self.issue(username, roles, TokenType::Access)?,
            refresh_token: self.issue(username, roles, TokenType::Refresh)?,
        })
    }

    pub fn decode_access(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode(token, TokenType::Access)
    }

    pub fn decode_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode(token, TokenType::Refresh)
    }

    #[instrument(skip(self, token))]
    fn decode(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            warn!(error = %e, "Failed to decode JWT token");
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        if token_data.claims.token_type != expected {
            warn!(?expected, actual = ?token_data.claims.token_type, "Wrong token type");
            return Err(AuthError::InvalidToken(format!(
                "expected {:?} token",
                expected
            )));
        }

        Ok(token_data.claims)
    }
}

/// Credential checks against the user store
#[derive(Clone)]
pub struct DatabaseAuthService {
    jwt_service: JwtService,
    users: Arc<dyn UserStore>,
    bcrypt_cost: u32,
}

impl DatabaseAuthService {
    pub fn new(jwt_service: JwtService, users: Arc<dyn UserStore>) -> Self {
        Self {
            jwt_service,
            users,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            AuthError::AuthenticationFailed(format!("Password hashing failed: {}", e))
        })
    }

    /// Check a username/password pair and issue a token pair.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = self.load_user(username).await?.ok_or_else(|| {
            warn!(username = %username, "User not found");
            AuthError::InvalidCredentials
        })?;

        ensure_enabled(&user)?;

        let password_valid = bcrypt::verify(password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            AuthError::AuthenticationFailed(format!("Password verification failed: {}", e))
        })?;

        if !password_valid {
            warn!(username = %username, "Invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.jwt_service.issue_pair(&user.user_name, &roles_of(&user))?;
        info!(user_id = user.user_id, username = %user.user_name, "User logged in successfully");
        Ok(pair)
    }

    /// Exchange a refresh token for a new pair; the user must still exist and be enabled.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        if refresh_token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = self.jwt_service.decode_refresh(refresh_token)?;
        let user = self.load_user(&claims.sub).await?.ok_or_else(|| {
            warn!(username = %claims.sub, "Refresh for unknown user");
            AuthError::InvalidToken("user no longer exists".to_string())
        })?;
        ensure_enabled(&user)?;

        let pair = self.jwt_service.issue_pair(&user.user_name, &roles_of(&user))?;
        info!(username = %user.user_name, "Token refreshed");
        Ok(pair)
    }

    async fn load_user(&self, username: &str) -> Result<Option<UserProfile>, AuthError> {
        self.users.find_by_username(username).await.map_err(|e| {
            error!(error = %e, username = %username, "Database error during login");
            AuthError::AuthenticationFailed(format!("Database error: {}", e))
        })
    }
}

fn ensure_enabled(user: &UserProfile) -> Result<(), AuthError> {
    if user.enabled {
        Ok(())
    } else {
        warn!(username = %user.user_name, "User account is disabled");
        Err(AuthError::AuthenticationFailed(
            "User account is disabled".to_string(),
        ))
    }
}

fn roles_of(user: &UserProfile) -> Vec<Role> {
    Role::parse(&user.role).into_iter().collect()
}
