//! Filesystem migration source

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::result::{Error, Result};
use crate::ports::MigrationSource;

/// Reads migration files from a single directory (not recursive)
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl MigrationSource for DirectorySource {
    fn file_names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("cannot read migrations directory {}: {}", self.dir.display(), e),
            ))
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            // Follows symlinks; a dangling link is skipped
            if !entry.path().is_file() {
                continue;
            }
            // Non-UTF-8 names can never match the migration pattern
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn read_to_string(&self, file_name: &str) -> Result<String> {
        let path = self.dir.join(file_name);
        fs::read_to_string(&path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("cannot read {}: {}", path.display(), e),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lists_only_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("0001_init.sql"), "create table a();").unwrap();
        fs::write(temp.path().join("notes.txt"), "hello").unwrap();
        fs::create_dir(temp.path().join("0002_dir.sql")).unwrap();

        let source = DirectorySource::new(temp.path());
        let mut names = source.file_names().unwrap();
        names.sort();
        assert_eq!(names, vec!["0001_init.sql", "notes.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_lists_symlinked_files() {
        let temp = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        let target = shared.path().join("init.sql");
        fs::write(&target, "create table a();").unwrap();
        std::os::unix::fs::symlink(&target, temp.path().join("0001_linked.sql")).unwrap();
        std::os::unix::fs::symlink(
            shared.path().join("missing.sql"),
            temp.path().join("0002_dangling.sql"),
        )
        .unwrap();

        let source = DirectorySource::new(temp.path());
        assert_eq!(source.file_names().unwrap(), vec!["0001_linked.sql"]);
        assert_eq!(
            source.read_to_string("0001_linked.sql").unwrap(),
            "create table a();"
        );
    }

    #[test]
    fn test_reads_file_verbatim() {
        let temp = TempDir::new().unwrap();
        let sql = "-- comment\ncreate table a (id int);\n\ninsert into a values (1);\n";
        fs::write(temp.path().join("0001_init.sql"), sql).unwrap();

        let source = DirectorySource::new(temp.path());
        assert_eq!(source.read_to_string("0001_init.sql").unwrap(), sql);
    }

    #[test]
    fn test_missing_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let source = DirectorySource::new(temp.path().join("nope"));
        let err = source.file_names().unwrap_err();
        assert!(err.to_string().contains("migrations directory"));
    }
}
