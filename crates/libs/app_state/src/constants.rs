use crate::{
    AuthConstants, DatabaseConstants, HomepageConstants, PaginationConstants, RawSettings,
    StorageConstants,
};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConstants {
    pub database: DatabaseConstants,
    pub auth: AuthConstants,
    pub pagination: PaginationConstants,
    pub homepage: HomepageConstants,
    pub storage: StorageConstants,
}

impl From<RawSettings> for AppConstants {
    fn from(raw: RawSettings) -> Self {
        let mut pagination = raw.constants.pagination;
        // A default larger than the cap would never be served.
        pagination.default_limit = pagination.default_limit.clamp(1, pagination.max_limit.max(1));

        Self {
            database: raw.constants.database,
            auth: raw.constants.auth,
            pagination,
            homepage: raw.constants.homepage,
            storage: raw.constants.storage,
        }
    }
}
