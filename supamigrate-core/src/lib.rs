//! Supamigrate Core - apply SQL migrations through the Supabase Management API
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: migration files, per-migration outcomes and run reports
//! - **ports**: traits for the remote query endpoint and the migration source
//! - **services**: the migration applier and the new-file scaffold
//! - **adapters**: the reqwest Management API client and the filesystem source

pub mod adapters;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod services;

use std::path::Path;

use adapters::{DirectorySource, ManagementApiClient};
use config::Config;
use services::MigrationService;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{ApplyOutcome, ApplyResult, MigrationFile, RunReport, StatusReport};

/// The service wired to the real Management API and a migrations directory
pub type RemoteMigrationService = MigrationService<ManagementApiClient, DirectorySource>;

/// Build a [`RemoteMigrationService`] from resolved configuration
///
/// Relative migration directories are resolved against `working_dir`.
pub fn remote_service(config: &Config, working_dir: &Path) -> Result<RemoteMigrationService> {
    let client = ManagementApiClient::new(config.api_config()?)?;
    let source = DirectorySource::new(working_dir.join(&config.migrations_dir));
    MigrationService::new(client, source).with_tracking_table(config.tracking_table.clone())
}
