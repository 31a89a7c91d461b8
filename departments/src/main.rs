use std::sync::Arc;

use anyhow::Result;
use sqlx::migrate::Migrator;

mod handlers;
mod routes;
mod state;

use common::bootstrap;
use common::db::repositories::DepartmentRepository;
use state::AppState;

static MIGRATOR: Migrator = sqlx::migrate!("../migrations/departments");

#[tokio::main]
async fn main() -> Result<()> {
    let settings = bootstrap::init(state::SERVICE)?;
    tracing::info!("Starting department service");

    let db_pool = bootstrap::init_database_pool(&settings, &MIGRATOR).await?;
    let state = AppState::new(Arc::new(DepartmentRepository::new(db_pool.clone())));

    let app = routes::create_router(state, &settings);
    bootstrap::serve(app, &settings).await?;

    db_pool.close().await;
    Ok(())
}
