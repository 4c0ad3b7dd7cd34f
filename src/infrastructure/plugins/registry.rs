//! Plugin registry - Resolves plugin names to descriptors

use async_trait::async_trait;
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::domain::entities::PluginDescriptor;
use crate::domain::traits::DescriptorSource;
use crate::infrastructure::storage::read_yaml;

/// Local checkout of the plugin registry: `<root>/registry/<name>.yaml`
pub struct RegistryDir {
    root: PathBuf,
}

impl RegistryDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn descriptor_path(&self, name: &str) -> PathBuf {
        self.root.join("registry").join(format!("{}.yaml", name))
    }
}

#[async_trait]
impl DescriptorSource for RegistryDir {
    async fn resolve(&self, name: &str) -> Result<PluginDescriptor, ConfigError> {
        // Names are file stems; anything path-like would read outside the checkout
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(ConfigError::InvalidValue(format!("invalid plugin name: {:?}", name)));
        }

        let path = self.descriptor_path(name);
        tracing::debug!("Resolving {} from {}", name, path.display());
        read_yaml(&path).await
    }
}

/// A single descriptor file on disk. A non-empty requested name must match
/// the name inside the file.
pub struct DescriptorFile {
    path: PathBuf,
}

impl DescriptorFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<PluginDescriptor, ConfigError> {
        read_yaml(&self.path).await
    }
}

#[async_trait]
impl DescriptorSource for DescriptorFile {
    async fn resolve(&self, name: &str) -> Result<PluginDescriptor, ConfigError> {
        let descriptor = self.load().await?;
        if !name.is_empty() && descriptor.name != name {
            return Err(ConfigError::InvalidValue(format!(
                "{} describes plugin {}, not {}",
                self.path.display(),
                descriptor.name,
                name
            )));
        }
        Ok(descriptor)
    }
}
