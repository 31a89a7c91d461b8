use std::sync::Arc;

use anyhow::Result;
use sqlx::migrate::Migrator;

mod handlers;
mod routes;
mod state;

use common::auth::{DatabaseAuthService, JwtService};
use common::bootstrap;
use common::db::repositories::UserRepository;
use state::AppState;

static MIGRATOR: Migrator = sqlx::migrate!("../migrations/authenticate");

#[tokio::main]
async fn main() -> Result<()> {
    let settings = bootstrap::init(state::SERVICE)?;
    tracing::info!("Starting authenticate service");

    let db_pool = bootstrap::init_database_pool(&settings, &MIGRATOR).await?;
    let users = Arc::new(UserRepository::new(db_pool.clone()));
    let auth = DatabaseAuthService::new(JwtService::from_config(&settings.auth), users.clone());
    let state = AppState::new(users, auth);

    let app = routes::create_router(state, &settings);
    bootstrap::serve(app, &settings).await?;

    db_pool.close().await;
    Ok(())
}
