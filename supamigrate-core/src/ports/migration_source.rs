//! Migration source port
//!
//! Where migration files come from. The filesystem adapter reads a
//! directory; tests can supply files from memory.

use crate::domain::result::Result;

/// Lists and reads migration files
pub trait MigrationSource {
    /// Names of all candidate entries, in no particular order
    fn file_names(&self) -> Result<Vec<String>>;

    /// Full text of one file
    fn read_to_string(&self, file_name: &str) -> Result<String>;
}
