use async_trait::async_trait;
use crate::domain::entities::PluginDescriptor;
use crate::application::errors::ConfigError;

/// Resolves a plugin name to its descriptor.
///
/// Used by every install path, whether the plugin comes from the registry
/// checkout or from a single descriptor file on disk.
#[async_trait]
pub trait DescriptorSource: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<PluginDescriptor, ConfigError>;
}
