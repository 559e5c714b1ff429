use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::session::SessionKeys;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub sessions: Arc<SessionKeys>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            sessions: Arc::new(SessionKeys::new(
                config.secret_key.as_bytes(),
                config.session_ttl_hours,
            )),
        }
    }
}
