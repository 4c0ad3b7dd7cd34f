//! Application services - Install and uninstall orchestration

pub mod pool;
pub mod installer;
pub mod uninstaller;

pub use pool::WorkerPool;
pub use installer::Installer;
pub use uninstaller::Uninstaller;
