//! Configuration management
//!
//! Settings are resolved in layers, later layers winning:
//!
//! 1. built-in defaults
//! 2. `supamigrate.json` (or the file passed with `--config`):
//!    ```json
//!    {
//!      "projectRef": "abcdefghijklmnop",
//!      "apiUrl": "https://api.supabase.com",
//!      "migrationsDir": "supabase/migrations",
//!      "trackingTable": "supabase_migrations.schema_migrations",
//!      "timeoutSecs": 120
//!    }
//!    ```
//! 3. environment variables (`SUPABASE_ACCESS_TOKEN`, `SUPABASE_PROJECT_REF`,
//!    `SUPABASE_API_URL`, `SUPAMIGRATE_MIGRATIONS_DIR`)
//! 4. command-line overrides
//!
//! The access token is never read from the settings file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::adapters::management_api::{ApiConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::domain::result::{Error, Result};
use crate::services::DEFAULT_TRACKING_TABLE;

/// Settings file looked up in the working directory
pub const SETTINGS_FILE_NAME: &str = "supamigrate.json";

/// Default location of migration files
pub const DEFAULT_MIGRATIONS_DIR: &str = "supabase/migrations";

pub const ACCESS_TOKEN_ENV: &str = "SUPABASE_ACCESS_TOKEN";
pub const PROJECT_REF_ENV: &str = "SUPABASE_PROJECT_REF";
pub const API_URL_ENV: &str = "SUPABASE_API_URL";
pub const MIGRATIONS_DIR_ENV: &str = "SUPAMIGRATE_MIGRATIONS_DIR";

/// Raw settings file structure. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    project_ref: Option<String>,
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    migrations_dir: Option<PathBuf>,
    #[serde(default)]
    tracking_table: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub project_ref: Option<String>,
    pub access_token: Option<String>,
    pub api_url: Option<String>,
    pub migrations_dir: Option<PathBuf>,
}

/// Resolved configuration
#[derive(Clone)]
pub struct Config {
    pub project_ref: Option<String>,
    pub access_token: Option<String>,
    pub api_url: String,
    pub migrations_dir: PathBuf,
    pub tracking_table: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_ref: None,
            access_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            migrations_dir: PathBuf::from(DEFAULT_MIGRATIONS_DIR),
            tracking_table: DEFAULT_TRACKING_TABLE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("project_ref", &self.project_ref)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("migrations_dir", &self.migrations_dir)
            .field("tracking_table", &self.tracking_table)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load config from the process environment
    ///
    /// With `explicit_path` the file must exist. Otherwise `supamigrate.json`
    /// in `working_dir` is used when present.
    pub fn load(explicit_path: Option<&Path>, working_dir: &Path) -> Result<Self> {
        Self::load_with_env(explicit_path, working_dir, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with a custom environment lookup
    pub fn load_with_env<F>(explicit_path: Option<&Path>, working_dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = match explicit_path {
            Some(path) => Self::read_settings(path)?,
            None => {
                let path = working_dir.join(SETTINGS_FILE_NAME);
                if path.exists() {
                    Self::read_settings(&path)?
                } else {
                    SettingsFile::default()
                }
            }
        };

        let mut config = Self::default();

        if let Some(project_ref) = settings.project_ref {
            config.project_ref = Some(project_ref);
        }
        if let Some(api_url) = settings.api_url {
            config.api_url = api_url;
        }
        if let Some(dir) = settings.migrations_dir {
            config.migrations_dir = dir;
        }
        if let Some(table) = settings.tracking_table {
            config.tracking_table = table;
        }
        if let Some(secs) = settings.timeout_secs {
            if secs == 0 {
                return Err(Error::config("\"timeoutSecs\" must be at least 1"));
            }
            config.timeout_secs = secs;
        }

        // Empty variables count as unset
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        if let Some(token) = lookup(ACCESS_TOKEN_ENV) {
            config.access_token = Some(token);
        }
        if let Some(project_ref) = lookup(PROJECT_REF_ENV) {
            config.project_ref = Some(project_ref);
        }
        if let Some(api_url) = lookup(API_URL_ENV) {
            config.api_url = api_url;
        }
        if let Some(dir) = lookup(MIGRATIONS_DIR_ENV) {
            config.migrations_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    fn read_settings(path: &Path) -> Result<SettingsFile> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read settings file {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            Error::config(format!("invalid settings file {}: {}", path.display(), e))
        })
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(project_ref) = overrides.project_ref {
            self.project_ref = Some(project_ref);
        }
        if let Some(token) = overrides.access_token {
            self.access_token = Some(token);
        }
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if let Some(dir) = overrides.migrations_dir {
            self.migrations_dir = dir;
        }
    }

    /// Build the API client configuration, failing if credentials are missing
    pub fn api_config(&self) -> Result<ApiConfig> {
        let access_token = self.access_token.clone().ok_or_else(|| {
            Error::config(format!(
                "no access token: set {} or pass --access-token",
                ACCESS_TOKEN_ENV
            ))
        })?;
        let project_ref = self.project_ref.clone().ok_or_else(|| {
            Error::config(format!(
                "no project ref: set {}, add \"projectRef\" to {}, or pass --project-ref",
                PROJECT_REF_ENV, SETTINGS_FILE_NAME
            ))
        })?;

        Ok(ApiConfig::new(project_ref, access_token)
            .with_base_url(self.api_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}
