//! Status command - compare local files with the tracking table

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;

use super::get_service;
use crate::output;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, json: bool) -> Result<ExitCode> {
    let service = get_service(global)?;
    let status = service.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Migration Status".bold());
    println!();

    if status.migrations.is_empty() {
        output::warning("No migration files found.");
    } else {
        println!("{}", output::status_table(&status));
        println!();
    }

    println!(
        "{} applied, {} pending",
        status.applied_count(),
        status.pending_count()
    );

    if !status.remote_only.is_empty() {
        println!();
        output::warning("Recorded remotely but missing locally:");
        for version in &status.remote_only {
            println!("  • {}", version);
        }
    }

    Ok(ExitCode::SUCCESS)
}
