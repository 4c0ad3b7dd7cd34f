//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Install/uninstall orchestration over a bounded worker pool
//! - Errors: Domain-specific errors

pub mod errors;
pub mod services;
