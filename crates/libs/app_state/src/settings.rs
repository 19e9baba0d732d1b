use crate::{ApiSettings, LoggingSettings, RawSettings, SecretSettings};
use std::path::{PathBuf, absolute};

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub secrets: SecretSettings,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Absolute folder that holds uploaded photo content.
    pub media_folder: PathBuf,
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        let media_folder =
            absolute(&raw.storage.media_folder).unwrap_or(raw.storage.media_folder);

        Self {
            logging: raw.logging,
            api: raw.api,
            storage: StorageSettings { media_folder },
            secrets: raw.secrets,
        }
    }
}

impl ApiSettings {
    /// Public url without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.public_url.trim_end_matches('/')
    }

    #[must_use]
    pub const fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}
