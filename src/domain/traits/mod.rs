//! Domain traits - Abstractions for infrastructure implementations

pub mod source;
pub mod store;

pub use source::DescriptorSource;
pub use store::ManifestStore;
