//! Per-migration outcomes and run summaries

use serde::{Deserialize, Serialize};

use super::migration::MigrationFile;

/// Maximum number of characters kept from a remote error message
pub const MAX_ERROR_MESSAGE_CHARS: usize = 300;

/// Truncate an error message for display, on a character boundary
pub fn truncate_message(message: &str) -> String {
    message.chars().take(MAX_ERROR_MESSAGE_CHARS).collect()
}

/// Outcome of attempting a single migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApplyOutcome {
    /// The SQL executed. `recorded` is whether the tracking insert also
    /// reported success; it does not affect the classification.
    Applied { recorded: bool },
    /// The SQL did not execute (or could not be sent)
    Failed { message: String },
}

/// Result of attempting one migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    pub file_name: String,
    pub version: String,
    pub name: String,
    #[serde(flatten)]
    pub outcome: ApplyOutcome,
}

impl ApplyResult {
    pub fn applied(migration: &MigrationFile, recorded: bool) -> Self {
        Self::new(migration, ApplyOutcome::Applied { recorded })
    }

    /// A failure; the message is truncated here
    pub fn failed(migration: &MigrationFile, message: &str) -> Self {
        Self::new(
            migration,
            ApplyOutcome::Failed {
                message: truncate_message(message),
            },
        )
    }

    fn new(migration: &MigrationFile, outcome: ApplyOutcome) -> Self {
        Self {
            file_name: migration.file_name.clone(),
            version: migration.version.clone(),
            name: migration.name.clone(),
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ApplyOutcome::Applied { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            ApplyOutcome::Failed { message } => Some(message),
            ApplyOutcome::Applied { .. } => None,
        }
    }
}

/// Summary of one `up` run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Versions recorded remotely before the run, ascending
    pub already_applied: Vec<String>,
    /// Number of local migration files discovered
    pub total_files: usize,
    /// Files that were not yet applied, in the order they were (or would be) attempted
    pub pending: Vec<String>,
    /// Outcomes in attempt order. Empty for a dry run.
    pub results: Vec<ApplyResult>,
    pub dry_run: bool,
}

impl RunReport {
    pub fn applied_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }

    /// File names of failed migrations, in attempt order
    pub fn failed_files(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.file_name.as_str())
            .collect()
    }

    /// The run failed iff at least one attempted migration failed
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| !r.is_success())
    }
}

/// State of a local migration relative to the tracking table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationState {
    Applied,
    Pending,
}

/// A local migration with its state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationStatus {
    #[serde(flatten)]
    pub migration: MigrationFile,
    pub state: MigrationState,
}

/// Read-only comparison of local files against the tracking table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusReport {
    pub migrations: Vec<MigrationStatus>,
    /// Versions recorded remotely with no matching local file
    pub remote_only: Vec<String>,
}

impl StatusReport {
    pub fn pending_count(&self) -> usize {
        self.migrations
            .iter()
            .filter(|m| m.state == MigrationState::Pending)
            .count()
    }

    pub fn applied_count(&self) -> usize {
        self.migrations.len() - self.pending_count()
    }
}
