use std::sync::Arc;

use anyhow::Result;
use sqlx::migrate::Migrator;

mod handlers;
mod routes;
mod state;

use common::bootstrap;
use common::db::repositories::JobDetailsRepository;
use state::AppState;

static MIGRATOR: Migrator = sqlx::migrate!("../migrations/job-details");

#[tokio::main]
async fn main() -> Result<()> {
    let settings = bootstrap::init(state::SERVICE)?;
    tracing::info!("Starting employee yearly job details service");

    let db_pool = bootstrap::init_database_pool(&settings, &MIGRATOR).await?;
    let state = AppState::new(Arc::new(JobDetailsRepository::new(db_pool.clone())));

    let app = routes::create_router(state, &settings);
    bootstrap::serve(app, &settings).await?;

    db_pool.close().await;
    Ok(())
}
