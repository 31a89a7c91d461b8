use anyhow::Result;

mod error;
mod handlers;
mod joined;
mod proxy;
mod routes;
mod state;

use common::{bootstrap, telemetry};
use state::GatewayState;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = bootstrap::init(state::SERVICE)?;
    tracing::info!(routes = settings.gateway.routes.len(), "Starting api gateway");

    let metrics = telemetry::init_metrics()?;
    let state = GatewayState::new(&settings.gateway, metrics)?;

    let app = routes::create_router(state, &settings);
    bootstrap::serve(app, &settings).await?;

    Ok(())
}
