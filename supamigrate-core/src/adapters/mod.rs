//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Supabase Management API over blocking reqwest for QueryExecutor
//! - Local filesystem directory for MigrationSource

pub mod filesystem;
pub mod management_api;

#[cfg(test)]
pub mod management_api_mock;

pub use filesystem::DirectorySource;
pub use management_api::{ApiConfig, ManagementApiClient};
