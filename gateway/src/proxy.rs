// Prefix routing to the backend services
//
// The request is replayed upstream with its method, path, query, headers and
// body; the upstream status, headers and body come back unchanged.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName},
    response::Response,
};
use tracing::{debug, instrument};

use common::config::RouteConfig;

use crate::error::GatewayError;
use crate::state::GatewayState;

/// Largest request body forwarded upstream
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const HOP_BY_HOP: [HeaderName; 4] = [
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::TE,
];

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteConfig>,
}

impl RouteTable {
    /// Longest prefixes are tried first.
    pub fn new(mut routes: Vec<RouteConfig>) -> Self {
        for route in &mut routes {
            route.prefix = route.prefix.trim_end_matches('/').to_string();
            route.upstream = route.upstream.trim_end_matches('/').to_string();
        }
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { routes }
    }

    /// Route owning `path`; a prefix only matches on a segment boundary.
    pub fn resolve(&self, path: &str) -> Option<&RouteConfig> {
        self.routes.iter().find(|route| {
            path.strip_prefix(route.prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|route| route.prefix.as_str())
    }
}

fn forwardable(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = headers.clone();
    forwarded.remove(header::HOST);
    forwarded.remove(header::CONTENT_LENGTH);
    for name in &HOP_BY_HOP {
        forwarded.remove(name);
    }
    forwarded
}

/// Fallback handler forwarding anything under a routed prefix.
#[instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
pub async fn forward(
    State(state): State<GatewayState>,
    request: Request,
) -> Result<Response, GatewayError> {
    let path = request.uri().path().to_string();
    let route = state
        .routes
        .resolve(&path)
        .ok_or_else(|| GatewayError::NoRoute(path.clone()))?;

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(path.as_str());
    let url = format!("{}{}", route.upstream, path_and_query);

    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| GatewayError::Body(e.to_string()))?;

    debug!(upstream = %url, "Forwarding request");
    let upstream = state
        .client
        .request(parts.method, &url)
        .headers(forwardable(&parts.headers))
        .body(body)
        .send()
        .await?;

    let status = upstream.status();
    let headers = forwardable(upstream.headers());
    let bytes = upstream.bytes().await?;
    debug!(upstream = %url, status = status.as_u16(), "Upstream responded");

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
