// Request filter: JWT extraction, access policy and request logging for Axum

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::auth::{JwtService, Role};
use crate::errors::AuthError;
use crate::telemetry;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Paths of the authenticate service reachable without a token
pub const AUTH_PUBLIC_PATHS: [&str; 3] = [
    "/api/v1/authenticates/addUsers",
    "/api/v1/authenticates/authenticate",
    "/api/v1/authenticates/refresh",
];

const DOC_PREFIXES: [&str; 2] = ["/swagger-ui", "/v3/api-docs"];

const GATEWAY_PREFIX: &str = "/api/v1/gateway";

/// Identity taken from a verified access token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub roles: Vec<Role>,
}

impl AuthenticatedUser {
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.roles.iter().any(|r| roles.contains(r))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyMode {
    /// Reads need USER or ADMIN, writes need ADMIN
    ByMethod,
    /// Any valid token passes; roles are left to the owning service
    AuthenticatedOnly,
}

/// Which requests need a token, and which roles they need
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    public_paths: Vec<String>,
    public_prefixes: Vec<String>,
    /// When set, only paths under these prefixes need a token; anything else
    /// falls through to the router's 404
    guarded_prefixes: Option<Vec<String>>,
    mode: PolicyMode,
}

impl AccessPolicy {
    /// Policy of a backend service mounted under `prefix`.
    pub fn for_service(prefix: &str) -> Self {
        let mut policy = Self {
            public_paths: AUTH_PUBLIC_PATHS.iter().map(|p| p.to_string()).collect(),
            public_prefixes: DOC_PREFIXES.iter().map(|p| p.to_string()).collect(),
            guarded_prefixes: None,
            mode: PolicyMode::ByMethod,
        };
        policy.add_connection_probes(prefix);
        policy
    }

    /// Policy of the gateway: the probes of every routed service are public,
    /// and paths outside the gateway and routed prefixes skip the token check.
    pub fn gateway<'a>(service_prefixes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut policy = Self::for_service(GATEWAY_PREFIX).with_public_path("/metrics");
        let mut guarded = vec![GATEWAY_PREFIX.to_string()];
        for prefix in service_prefixes {
            policy.add_connection_probes(prefix);
            guarded.push(prefix.trim_end_matches('/').to_string());
        }
        policy.guarded_prefixes = Some(guarded);
        policy.mode = PolicyMode::AuthenticatedOnly;
        policy
    }

    pub fn with_public_path(mut self, path: impl Into<String>) -> Self {
        self.public_paths.push(path.into());
        self
    }

    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    fn add_connection_probes(&mut self, prefix: &str) {
        let prefix = prefix.trim_end_matches('/');
        self.public_paths.push(format!("{}/testConnection", prefix));
        self.public_paths.push(format!("{}/testDataBaseConnection", prefix));
    }

    pub fn is_public(&self, path: &str) -> bool {
        let path = match path.len() {
            1 => path,
            _ => path.trim_end_matches('/'),
        };
        self.public_paths.iter().any(|p| p == path)
            || self.public_prefixes.iter().any(|p| path.starts_with(p.as_str()))
            || self.guarded_prefixes.as_ref().is_some_and(|guarded| {
                !guarded.iter().any(|prefix| under_prefix(path, prefix))
            })
    }

    /// Roles accepted for `method`; empty means any authenticated caller.
    pub fn required_roles(&self, method: &Method) -> &'static [Role] {
        match self.mode {
            PolicyMode::AuthenticatedOnly => &[],
            PolicyMode::ByMethod => {
                if method == Method::GET || method == Method::HEAD || method == Method::OPTIONS {
                    &[Role::User, Role::Admin]
                } else {
                    &[Role::Admin]
                }
            }
        }
    }

    /// Decide a request given what the Authorization header yielded.
    pub fn authorize(
        &self,
        method: &Method,
        path: &str,
        credentials: Option<&Result<AuthenticatedUser, AuthError>>,
    ) -> Result<(), AuthError> {
        if self.is_public(path) {
            return Ok(());
        }

        let user = match credentials {
            None => return Err(AuthError::MissingToken),
            Some(Err(err)) => return Err(err.clone()),
            Some(Ok(user)) => user,
        };

        let required = self.required_roles(method);
        if required.is_empty() || user.has_any_role(required) {
            Ok(())
        } else {
            let needed: Vec<String> = required.iter().map(|r| r.to_string()).collect();
            Err(AuthError::InsufficientPermissions(needed.join(" or ")))
        }
    }
}

fn under_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// State of the request filter layer
#[derive(Clone)]
pub struct RequestFilter {
    jwt: JwtService,
    policy: Arc<AccessPolicy>,
}

impl RequestFilter {
    pub fn new(jwt: JwtService, policy: AccessPolicy) -> Self {
        Self {
            jwt,
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    fn credentials(&self, request: &Request) -> Option<Result<AuthenticatedUser, AuthError>> {
        let token = bearer_token(request)?;
        Some(self.jwt.decode_access(token).map(|claims| AuthenticatedUser {
            roles: claims.roles(),
            username: claims.sub,
        }))
    }
}

/// Token from `Authorization: Bearer <jwt>`; other schemes count as absent.
pub fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verify the bearer token, apply the access policy and expose the caller
/// as an `AuthenticatedUser` extension.
#[instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
pub async fn auth_middleware(
    State(filter): State<RequestFilter>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let credentials = filter.credentials(&request);

    filter
        .policy
        .authorize(request.method(), request.uri().path(), credentials.as_ref())
        .inspect_err(|err| warn!(error = %err, "Request rejected by access policy"))?;

    if let Some(Ok(user)) = credentials {
        debug!(username = %user.username, roles = ?user.roles, "Authenticated request");
        request.extensions_mut().insert(user);
    }

    Ok(next.run(request).await)
}

/// Log every request, count it, and tag it with a request id.
pub async fn request_logging(
    State(service): State<&'static str>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .cloned()
        .or_else(|| HeaderValue::from_str(&Uuid::new_v4().to_string()).ok());
    if let Some(id) = &request_id {
        request.headers_mut().insert(REQUEST_ID_HEADER, id.clone());
    }

    info!(service = service, request_id = ?request_id, "Request received: {} {}", method, uri);
    telemetry::record_request(service, method.as_str());

    let mut response = next.run(request).await;

    info!(
        service = service,
        method = %method,
        path = %uri.path(),
        status = response.status().as_u16(),
        "Request completed"
    );

    if let Some(id) = request_id {
        response.headers_mut().insert(REQUEST_ID_HEADER, id);
    }
    response
}
