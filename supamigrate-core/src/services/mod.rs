//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions.

pub mod migration;
mod scaffold;

pub use migration::{MigrationService, Progress, DEFAULT_TRACKING_TABLE};
pub use scaffold::create_migration;
