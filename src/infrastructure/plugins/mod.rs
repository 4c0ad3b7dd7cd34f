//! Plugin sources and payload handling
//! 
//! Descriptors are resolved from a registry checkout or a single file, archives
//! are downloaded over HTTP and unpacked with a zip-slip guard.

pub mod registry;
pub mod fetcher;
pub mod extractor;

pub use registry::{RegistryDir, DescriptorFile};
pub use fetcher::Fetcher;
pub use extractor::{extract, ExtractSummary};
