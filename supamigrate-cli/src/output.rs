//! Console rendering for migration runs and status

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use supamigrate_core::domain::MigrationState;
use supamigrate_core::{ApplyResult, RunReport, StatusReport};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message to stderr
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Finish a `  file... ` progress line
pub fn apply_result(result: &ApplyResult) {
    match result.error_message() {
        None => println!("{}", "OK".green()),
        Some(message) => {
            println!("{}", "FAILED".red());
            println!("    {} {}", "ERROR:".red(), message);
        }
    }
}

/// `Already applied: N (latest V)`
pub fn applied_line(report: &RunReport) -> String {
    match report.already_applied.last() {
        Some(latest) => format!(
            "Already applied: {} (latest {})",
            report.already_applied.len(),
            latest
        ),
        None => "Already applied: none".to_string(),
    }
}

/// `Results: X applied, Y failed`
pub fn results_line(report: &RunReport) -> String {
    format!(
        "Results: {} applied, {} failed",
        report.applied_count(),
        report.failed_count()
    )
}

/// One row per local migration file
pub fn status_table(status: &StatusReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Version", "Name", "State"]);
    for entry in &status.migrations {
        let state = match entry.state {
            MigrationState::Applied => "applied".green().to_string(),
            MigrationState::Pending => "pending".yellow().to_string(),
        };
        table.add_row(vec![
            entry.migration.version.clone(),
            entry.migration.name.clone(),
            state,
        ]);
    }
    table
}
