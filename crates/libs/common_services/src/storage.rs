use app_state::to_posix_string;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use std::fmt::Debug;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use crate::utils::nice_id;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where photo bytes live. Keys are relative, `/`-separated paths.
#[async_trait]
pub trait ObjectStorage: Send + Sync + Debug {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Removing a key that does not exist is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Public url for a key.
    fn url(&self, key: &str) -> String;
}

/// Stores objects as files under a media folder, served back at `{base_url}/{key}`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    #[must_use]
    pub fn new(root: PathBuf, base_url: &str) -> Self {
        Self {
            root,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let is_safe = !key.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !is_safe {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        debug!("Stored {} bytes at {}", bytes.len(), to_posix_string(&path));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Object {key} was already gone.");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }
}

/// Key for a new photo upload: `photos/YYYY/MM/DD/<random id>.<format>`.
#[must_use]
pub fn photo_object_key(now: DateTime<Utc>, format: &str, id_length: usize) -> String {
    let file_name = if format.is_empty() {
        nice_id(id_length)
    } else {
        format!("{}.{format}", nice_id(id_length))
    };
    format!(
        "photos/{:04}/{:02}/{:02}/{file_name}",
        now.year(),
        now.month(),
        now.day()
    )
}
