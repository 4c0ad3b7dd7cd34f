//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Settings loading and path helpers
//! - Storage: YAML files and the manifest store
//! - Plugins: Registry lookup, downloads, archive extraction

pub mod config;
pub mod storage;
pub mod plugins;
