//! Migration service - applies pending migrations to the remote project
//!
//! Applied versions live in a remote tracking table. Every run fetches that
//! set fresh, diffs it against the local files and applies whatever is
//! missing, strictly in file-name order. A failed migration is reported and
//! the run moves on to the next one.
//!
//! Executing a migration and recording it in the tracking table are two
//! separate requests. If the process dies between them the schema change is
//! in place but untracked, and the next run will try to apply it again.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::domain::migration::has_mixed_version_widths;
use crate::domain::result::{Error, Result};
use crate::domain::{
    ApplyResult, MigrationFile, MigrationState, MigrationStatus, RunReport, StatusReport,
};
use crate::ports::{MigrationSource, QueryExecutor};

/// Tracking table used by the Supabase CLI
pub const DEFAULT_TRACKING_TABLE: &str = "supabase_migrations.schema_migrations";

/// Progress notifications emitted while a run is in flight
#[derive(Debug)]
pub enum Progress<'a> {
    /// Remote state fetched and pending files worked out; `results` is empty
    Planned(&'a RunReport),
    /// About to execute this migration
    Started(&'a MigrationFile),
    /// Finished attempting a migration
    Finished(&'a ApplyResult),
}

/// Row shape returned by the applied-versions query
#[derive(Debug, Deserialize)]
struct VersionRow {
    #[serde(deserialize_with = "deserialize_version")]
    version: String,
}

/// Versions are text in the tracking table, but accept numbers too
fn deserialize_version<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        _ => Err(D::Error::custom("expected string or number for version")),
    }
}

fn table_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$").unwrap()
    })
}

/// Quote a value as a SQL string literal
fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Service for applying migrations through a [`QueryExecutor`]
pub struct MigrationService<E, S> {
    executor: E,
    source: S,
    tracking_table: String,
}

impl<E: QueryExecutor, S: MigrationSource> MigrationService<E, S> {
    /// Create a service using the default tracking table
    pub fn new(executor: E, source: S) -> Self {
        Self {
            executor,
            source,
            tracking_table: DEFAULT_TRACKING_TABLE.to_string(),
        }
    }

    /// Use a different tracking table (`table` or `schema.table`)
    pub fn with_tracking_table(mut self, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        if !table_name_re().is_match(&table) {
            return Err(Error::validation(format!(
                "invalid tracking table name '{}'",
                table
            )));
        }
        self.tracking_table = table;
        Ok(self)
    }

    pub fn tracking_table(&self) -> &str {
        &self.tracking_table
    }

    /// List local migrations, sorted ascending by file name
    ///
    /// Entries that don't match `<digits>_<name>.sql` are ignored.
    pub fn discover(&self) -> Result<Vec<MigrationFile>> {
        let mut migrations: Vec<MigrationFile> = self
            .source
            .file_names()?
            .iter()
            .filter_map(|name| {
                let parsed = MigrationFile::parse(name);
                if parsed.is_none() {
                    debug!(file = %name, "ignoring non-migration file");
                }
                parsed
            })
            .collect();
        migrations.sort();

        if has_mixed_version_widths(&migrations) {
            warn!("migration versions have different digit widths; files are applied in file-name order, which may differ from numeric order");
        }

        Ok(migrations)
    }

    /// Fetch versions already recorded in the tracking table
    ///
    /// Any failure here is fatal: without the applied set a run could
    /// re-apply or skip migrations blindly.
    pub fn fetch_applied(&self) -> Result<BTreeSet<String>> {
        let sql = format!(
            "SELECT version FROM {} ORDER BY version",
            self.tracking_table
        );
        let response = self.executor.run_query(&sql)?;

        if !response.is_success() {
            return Err(Error::FetchApplied {
                status: response.status,
                body: response.body,
            });
        }

        let rows: Vec<VersionRow> = serde_json::from_str(&response.body).map_err(|e| {
            Error::InvalidResponse(format!("cannot parse applied versions: {}", e))
        })?;

        Ok(rows.into_iter().map(|r| r.version).collect())
    }

    /// Apply one migration and record it
    ///
    /// Never returns an error: a read failure, transport failure or non-201
    /// response all become a failed [`ApplyResult`].
    pub fn apply(&self, migration: &MigrationFile) -> ApplyResult {
        let sql = match self.source.read_to_string(&migration.file_name) {
            Ok(sql) => sql,
            Err(e) => return ApplyResult::failed(migration, &e.to_string()),
        };

        let response = match self.executor.run_query(&sql) {
            Ok(response) => response,
            Err(e) => return ApplyResult::failed(migration, &e.to_string()),
        };

        if !response.is_success() {
            let message = response.error_message();
            warn!(file = %migration.file_name, status = response.status, "migration failed");
            return ApplyResult::failed(migration, &message);
        }

        let recorded = self.record(migration);
        ApplyResult::applied(migration, recorded)
    }

    /// Insert the tracking row. The result is informational only.
    fn record(&self, migration: &MigrationFile) -> bool {
        let sql = format!(
            "INSERT INTO {}(version, name) VALUES({}, {}) ON CONFLICT DO NOTHING",
            self.tracking_table,
            sql_literal(&migration.version),
            sql_literal(&migration.name),
        );

        match self.executor.run_query(&sql) {
            Ok(response) if response.is_success() => true,
            Ok(response) => {
                warn!(
                    version = %migration.version,
                    status = response.status,
                    body = %response.body,
                    "migration applied but could not be recorded"
                );
                false
            }
            Err(e) => {
                warn!(version = %migration.version, error = %e, "migration applied but could not be recorded");
                false
            }
        }
    }

    /// Apply all pending migrations
    pub fn run(&self) -> Result<RunReport> {
        self.run_with_progress(|_| {})
    }

    /// Apply all pending migrations, reporting progress as each one runs
    pub fn run_with_progress<F>(&self, mut on_progress: F) -> Result<RunReport>
    where
        F: FnMut(Progress<'_>),
    {
        let (mut report, pending) = self.plan()?;
        on_progress(Progress::Planned(&report));

        for migration in &pending {
            on_progress(Progress::Started(migration));
            let result = self.apply(migration);
            if result.is_success() {
                info!(file = %migration.file_name, "applied");
            }
            on_progress(Progress::Finished(&result));
            report.results.push(result);
        }

        Ok(report)
    }

    /// Work out what a run would apply, without executing anything
    pub fn dry_run(&self) -> Result<RunReport> {
        let (mut report, _) = self.plan()?;
        report.dry_run = true;
        Ok(report)
    }

    /// Fetch state, discover files and split out the pending ones, in order
    fn plan(&self) -> Result<(RunReport, Vec<MigrationFile>)> {
        let applied = self.fetch_applied()?;
        let migrations = self.discover()?;
        info!(
            applied = applied.len(),
            files = migrations.len(),
            "loaded migration state"
        );

        let total_files = migrations.len();
        let pending: Vec<MigrationFile> = migrations
            .into_iter()
            .filter(|m| !applied.contains(&m.version))
            .collect();

        let report = RunReport {
            already_applied: applied.into_iter().collect(),
            total_files,
            pending: pending.iter().map(|m| m.file_name.clone()).collect(),
            results: Vec::new(),
            dry_run: false,
        };
        Ok((report, pending))
    }

    /// Compare local files with the tracking table without changing anything
    pub fn status(&self) -> Result<StatusReport> {
        let applied = self.fetch_applied()?;
        let migrations = self.discover()?;

        let local: BTreeSet<&str> = migrations.iter().map(|m| m.version.as_str()).collect();
        let remote_only = applied
            .iter()
            .filter(|v| !local.contains(v.as_str()))
            .cloned()
            .collect();

        let migrations = migrations
            .into_iter()
            .map(|migration| {
                let state = if applied.contains(&migration.version) {
                    MigrationState::Applied
                } else {
                    MigrationState::Pending
                };
                MigrationStatus { migration, state }
            })
            .collect();

        Ok(StatusReport {
            migrations,
            remote_only,
        })
    }
}
