//! File-based storage implementation

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::application::errors::{ConfigError, ConfigResult, ManifestError};
use crate::domain::entities::Manifest;
use crate::domain::traits::ManifestStore;

/// Read and parse a YAML document
pub async fn read_yaml<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::Io { path: path.to_path_buf(), source: e });
        }
    };

    serde_yaml::from_str(&content)
        .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), source: e })
}

/// Serialize `value` and overwrite `path` with it
pub async fn write_yaml<T: Serialize>(path: &Path, value: &T) -> ConfigResult<()> {
    let content = serde_yaml::to_string(value).map_err(ConfigError::Serialize)?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ConfigError::Io { path: path.to_path_buf(), source: e })
}

/// Manifest kept as a single YAML file.
///
/// Writes overwrite the file in place; a crash mid-write can truncate it.
pub struct YamlManifestStore {
    path: PathBuf,
}

impl YamlManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an empty manifest, refusing to clobber an existing one
    pub async fn init(&self) -> Result<(), ManifestError> {
        if tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Err(ManifestError::AlreadyInitialized(self.path.clone()));
        }
        self.save(&Manifest::new()).await?;
        Ok(())
    }
}

#[async_trait]
impl ManifestStore for YamlManifestStore {
    async fn load(&self) -> Result<Manifest, ConfigError> {
        read_yaml(&self.path).await
    }

    async fn save(&self, manifest: &Manifest) -> Result<(), ConfigError> {
        write_yaml(&self.path, manifest).await
    }
}
