use serde::Deserialize;
use std::path::PathBuf;

/// Settings exactly as they appear in `settings.yaml` (and the `APP__` environment overrides).
#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub storage: RawStorageSettings,
    pub secrets: SecretSettings,
    pub constants: RawConstants,
}

/// Where uploaded photo content is written.
#[derive(Debug, Deserialize, Clone)]
pub struct RawStorageSettings {
    pub media_folder: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    /// Base url clients use to reach this server, used to build image urls.
    pub public_url: String,
    /// Upper bound for a single request body, in megabytes.
    pub max_upload_mb: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub jwt: String,
    pub database_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawConstants {
    #[serde(default)]
    pub database: DatabaseConstants,
    #[serde(default)]
    pub auth: AuthConstants,
    #[serde(default)]
    pub pagination: PaginationConstants,
    #[serde(default)]
    pub homepage: HomepageConstants,
    #[serde(default)]
    pub storage: StorageConstants,
}

/// Database connection pool configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConstants {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: u64,
    pub idle_timeout: u64,
    pub acquire_timeout: u64,
}

impl Default for DatabaseConstants {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            max_lifetime: 1800,
            idle_timeout: 300,
            acquire_timeout: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConstants {
    pub access_token_expiry_minutes: i64,
    pub min_password_length: usize,
}

impl Default for AuthConstants {
    fn default() -> Self {
        Self {
            access_token_expiry_minutes: 60,
            min_password_length: 8,
        }
    }
}

/// Limit/offset pagination bounds for list endpoints.
#[derive(Debug, Deserialize, Clone)]
pub struct PaginationConstants {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for PaginationConstants {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 20,
        }
    }
}

/// How many recent items the homepage aggregate returns.
#[derive(Debug, Deserialize, Clone)]
pub struct HomepageConstants {
    pub photo_count: i64,
    pub album_count: i64,
}

impl Default for HomepageConstants {
    fn default() -> Self {
        Self {
            photo_count: 10,
            album_count: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConstants {
    /// Length of the random file name given to stored photos.
    pub object_id_length: usize,
}

impl Default for StorageConstants {
    fn default() -> Self {
        Self {
            object_id_length: 16,
        }
    }
}
