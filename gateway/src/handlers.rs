use axum::extract::State;

use common::health;
use common::response::ApiResponse;

use crate::state::{GatewayState, DISPLAY_NAME};

pub async fn test_connection() -> ApiResponse<()> {
    health::application_up(DISPLAY_NAME)
}

/// Prometheus text exposition
pub async fn metrics(State(state): State<GatewayState>) -> String {
    state.metrics.render()
}
