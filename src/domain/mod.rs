//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (PluginDescriptor, Manifest)
//! - Traits: Abstractions for infrastructure (DescriptorSource, ManifestStore)

pub mod entities;
pub mod traits;
