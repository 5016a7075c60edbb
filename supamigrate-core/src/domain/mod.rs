//! Core domain entities
//!
//! Pure data structures with parsing and classification logic - no I/O.

pub mod migration;
pub mod report;
pub mod result;

pub use migration::MigrationFile;
pub use report::{
    ApplyOutcome, ApplyResult, MigrationState, MigrationStatus, RunReport, StatusReport,
};
