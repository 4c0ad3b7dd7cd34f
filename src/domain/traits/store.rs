use async_trait::async_trait;
use crate::application::errors::{ConfigError, ManifestError};
use crate::domain::entities::{Manifest, PluginDescriptor};

/// ManifestStore trait - abstraction for manifest persistence
#[async_trait]
pub trait ManifestStore: Send + Sync {
    async fn load(&self) -> Result<Manifest, ConfigError>;

    /// Overwrite the stored manifest in full
    async fn save(&self, manifest: &Manifest) -> Result<(), ConfigError>;

    /// Load, reject a duplicate name, append and save
    async fn add_plugin(&self, descriptor: PluginDescriptor) -> Result<(), ManifestError> {
        let mut manifest = self.load().await?;
        let name = descriptor.name.clone();
        if !manifest.add(descriptor) {
            return Err(ManifestError::DuplicatePlugin(name));
        }
        self.save(&manifest).await?;
        Ok(())
    }

    /// Load, drop every entry named `name` and save. Absent names are a
    /// no-op and leave the file untouched.
    async fn remove_plugin(&self, name: &str) -> Result<usize, ManifestError> {
        let mut manifest = self.load().await?;
        let removed = manifest.remove(name);
        if removed > 0 {
            self.save(&manifest).await?;
        }
        Ok(removed)
    }
}
