use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;

use common::config::GatewayConfig;

use crate::error::GatewayError;
use crate::proxy::RouteTable;

pub const SERVICE: &str = "gateway";
pub const DISPLAY_NAME: &str = "API Gateway";
pub const PREFIX: &str = "/api/v1/gateway";

#[derive(Clone)]
pub struct GatewayState {
    pub client: reqwest::Client,
    pub routes: Arc<RouteTable>,
    pub employee_service_url: String,
    pub project_service_url: String,
    pub metrics: PrometheusHandle,
}

impl GatewayState {
    pub fn new(config: &GatewayConfig, metrics: PrometheusHandle) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_seconds))
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;

        Ok(Self {
            client,
            routes: Arc::new(RouteTable::new(config.routes.clone())),
            employee_service_url: config.employee_service_url.trim_end_matches('/').to_string(),
            project_service_url: config.project_service_url.trim_end_matches('/').to_string(),
            metrics,
        })
    }
}
