//! Up command - apply pending migrations

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use supamigrate_core::services::Progress;
use supamigrate_core::RunReport;

use super::get_service;
use crate::output;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, dry_run: bool, json: bool) -> Result<ExitCode> {
    let service = get_service(global)?;

    if dry_run {
        let report = service.dry_run()?;
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_plan(&report);
            if report.pending.is_empty() {
                output::success("Nothing to apply");
            } else {
                println!("{}", "DRY RUN - would apply:".yellow());
                for file in &report.pending {
                    println!("  {}", file);
                }
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let report = if json {
        service.run()?
    } else {
        service.run_with_progress(print_progress)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(exit_code(&report))
}

/// Non-zero iff at least one attempted migration failed
pub fn exit_code(report: &RunReport) -> ExitCode {
    if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_plan(report: &RunReport) {
    println!("{}", output::applied_line(report));
    println!("Total migration files: {}", report.total_files);
    println!();
}

fn print_progress(progress: Progress<'_>) {
    match progress {
        Progress::Planned(report) => print_plan(report),
        Progress::Started(migration) => {
            print!("  {}... ", migration.file_name);
            let _ = std::io::stdout().flush();
        }
        Progress::Finished(result) => output::apply_result(result),
    }
}

fn print_summary(report: &RunReport) {
    println!();
    let line = output::results_line(report);
    if report.has_failures() {
        output::error(&line);
        output::error(&format!(
            "Failed migrations: {}",
            report.failed_files().join(", ")
        ));
    } else {
        output::success(&line);
    }
}
