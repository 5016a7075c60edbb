//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The migration
//! service depends only on these traits, not on concrete implementations.

mod migration_source;
mod query_executor;

pub use migration_source::MigrationSource;
pub use query_executor::{QueryExecutor, QueryResponse, SUCCESS_STATUS};
