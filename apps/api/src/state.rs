use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api_client::{StaffingApi, Transport};
use crate::config::Config;
use crate::sessions::Sessions;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub api: StaffingApi,
    /// Entity collections, shared by every session.
    pub store: Arc<RwLock<Store>>,
    pub sessions: Arc<Sessions>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            api: StaffingApi::new(transport),
            store: Arc::new(RwLock::new(Store::new())),
            sessions: Arc::new(Sessions::new(
                config.session_idle_timeout,
                config.max_sessions,
            )),
            config,
        }
    }
}
