//! New command - create an empty migration file

use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use supamigrate_core::services::create_migration;

use super::{get_config, get_working_dir};
use crate::output;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, name: &str) -> Result<ExitCode> {
    let config = get_config(global)?;
    let dir = get_working_dir()?.join(&config.migrations_dir);

    let path = create_migration(&dir, name, Utc::now())?;
    output::success(&format!("Created {}", path.display()));

    Ok(ExitCode::SUCCESS)
}
