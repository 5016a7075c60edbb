//! Migration file domain model
//!
//! A migration file is named `<version>_<name>.sql`, where `<version>` is a
//! run of digits. Ordering is by file name, which matches numeric version
//! order only while every version token has the same digit width.

use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Format used for versions of newly created migrations (UTC, 14 digits)
pub const VERSION_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn file_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)_(.+)\.sql$").unwrap())
}

/// A local migration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationFile {
    /// Digit prefix, kept as a string (e.g. "0001", "20240101120000")
    pub version: String,
    /// Remainder of the file name before `.sql`
    pub name: String,
    /// Full file name, e.g. "0001_init.sql"
    pub file_name: String,
}

impl MigrationFile {
    /// Parse a file name. Returns `None` when it does not look like a migration.
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = file_name_re().captures(file_name)?;
        Some(Self {
            version: caps[1].to_string(),
            name: caps[2].to_string(),
            file_name: file_name.to_string(),
        })
    }
}

impl Ord for MigrationFile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.file_name.cmp(&other.file_name)
    }
}

impl PartialOrd for MigrationFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// True when version tokens differ in width, so lexical order may not be numeric order
pub fn has_mixed_version_widths(migrations: &[MigrationFile]) -> bool {
    let mut widths = migrations.iter().map(|m| m.version.len());
    match widths.next() {
        Some(first) => widths.any(|w| w != first),
        None => false,
    }
}

/// Turn a free-form description into a file-name-safe slug
///
/// Lowercases, and collapses every run of non-alphanumeric characters into a
/// single underscore. Leading and trailing underscores are dropped.
pub fn slugify(description: &str) -> String {
    let mut slug = String::with_capacity(description.len());
    let mut pending_sep = false;

    for c in description.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}

/// File name for a new migration created at `now`
pub fn new_file_name(now: DateTime<Utc>, slug: &str) -> String {
    format!("{}_{}.sql", now.format(VERSION_TIMESTAMP_FORMAT), slug)
}
