use std::sync::Arc;

use tokio::sync::Mutex;

use scholaris_config::{CorsConfig, DatabaseConfig, TransitionConfig};
use scholaris_db::init_db_pool;

use crate::store::PgStore;

/// Shared handler state. Generic over the store so the router can run against
/// an in-memory store in tests.
#[derive(Clone, Debug)]
pub struct AppState<S = PgStore> {
    pub store: S,
    pub transition_config: TransitionConfig,
    pub cors_config: CorsConfig,
    /// Held for the duration of a transition run
    pub transition_lock: Arc<Mutex<()>>,
}

impl<S> AppState<S> {
    pub fn new(store: S, transition_config: TransitionConfig, cors_config: CorsConfig) -> Self {
        Self {
            store,
            transition_config,
            cors_config,
            transition_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let pool = init_db_pool(&DatabaseConfig::from_env()).await?;

    Ok(AppState::new(
        PgStore::new(pool),
        TransitionConfig::from_env(),
        CorsConfig::from_env(),
    ))
}
