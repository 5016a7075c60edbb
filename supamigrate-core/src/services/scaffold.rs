//! Scaffold service - creates new, empty migration files

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::migration::{new_file_name, slugify};
use crate::domain::result::{Error, Result};

/// Create `<UTC timestamp>_<slug>.sql` in `dir`, creating `dir` if needed
///
/// Refuses to overwrite an existing file.
pub fn create_migration(dir: &Path, description: &str, now: DateTime<Utc>) -> Result<PathBuf> {
    let slug = slugify(description);
    if slug.is_empty() {
        return Err(Error::validation(format!(
            "migration name '{}' has no usable characters",
            description
        )));
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(new_file_name(now, &slug));

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => {
                Error::validation(format!("{} already exists", path.display()))
            }
            _ => Error::Io(e),
        })?;

    info!(path = %path.display(), "created migration");
    Ok(path)
}
