//! Domain entities - Core business objects with no external dependencies

pub mod plugin;
pub mod manifest;

pub use plugin::PluginDescriptor;
pub use manifest::Manifest;
