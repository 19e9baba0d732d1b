use app_state::AppSettings;
use axum::extract::FromRef;
use common_services::storage::ObjectStorage;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiContext {
    pub pool: SqlitePool,
    pub settings: AppSettings,
    pub storage: Arc<dyn ObjectStorage>,
}

// Lets extractors and middleware pull a single part of the state.
impl FromRef<ApiContext> for SqlitePool {
    fn from_ref(state: &ApiContext) -> Self {
        state.pool.clone()
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}

impl FromRef<ApiContext> for Arc<dyn ObjectStorage> {
    fn from_ref(state: &ApiContext) -> Self {
        state.storage.clone()
    }
}
