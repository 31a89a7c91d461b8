use std::sync::Arc;

use common::auth::DatabaseAuthService;
use common::db::UserStore;

pub const SERVICE: &str = "authenticate";
pub const DISPLAY_NAME: &str = "Authenticate";
pub const PREFIX: &str = "/api/v1/authenticates";

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub auth: DatabaseAuthService,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, auth: DatabaseAuthService) -> Self {
        Self { users, auth }
    }
}
