//! CLI command implementations

pub mod new;
pub mod status;
pub mod up;

use std::path::PathBuf;

use anyhow::{Context, Result};
use supamigrate_core::config::{Config, Overrides};
use supamigrate_core::RemoteMigrationService;

use crate::GlobalArgs;

/// Working directory that relative paths are resolved against
pub fn get_working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to determine the current directory")
}

/// Load configuration: settings file, then environment, then flags
pub fn get_config(global: &GlobalArgs) -> Result<Config> {
    let working_dir = get_working_dir()?;
    let mut config = Config::load(global.config.as_deref(), &working_dir)
        .context("Failed to load configuration")?;

    config.apply_overrides(Overrides {
        project_ref: global.project_ref.clone(),
        access_token: global.access_token.clone(),
        api_url: global.api_url.clone(),
        migrations_dir: global.dir.clone(),
    });

    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

/// Build the migration service against the configured project
pub fn get_service(global: &GlobalArgs) -> Result<RemoteMigrationService> {
    let config = get_config(global)?;
    let working_dir = get_working_dir()?;
    supamigrate_core::remote_service(&config, &working_dir)
        .context("Failed to set up the Management API client")
}
