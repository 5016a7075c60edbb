//! Supabase Management API client
//!
//! Runs SQL through `POST /v1/projects/{ref}/database/query`. The endpoint
//! answers 201 with a JSON array of rows on success, and a non-201 status
//! with a JSON body carrying a `message` field on failure.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::domain::result::{Error, Result};
use crate::ports::{QueryExecutor, QueryResponse};

/// Default production API URL
pub const DEFAULT_API_URL: &str = "https://api.supabase.com";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the Management API
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub project_ref: String,
    pub access_token: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(project_ref: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            project_ref: project_ref.into(),
            access_token: access_token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Never print the token
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("project_ref", &self.project_ref)
            .field("access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

/// Management API client
#[derive(Debug)]
pub struct ManagementApiClient {
    client: Client,
    query_url: String,
    config: ApiConfig,
}

impl ManagementApiClient {
    /// Create a client, validating the configuration
    pub fn new(config: ApiConfig) -> Result<Self> {
        if config.access_token.trim().is_empty() {
            return Err(Error::config("access token cannot be empty"));
        }
        if config.project_ref.trim().is_empty() {
            return Err(Error::config("project ref cannot be empty"));
        }
        if config.timeout.is_zero() {
            return Err(Error::config("request timeout must be greater than zero"));
        }

        let base_url = config.base_url.trim_end_matches('/');
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::config(format!("invalid API URL '{}': {}", config.base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "API URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let query_url = format!(
            "{}/v1/projects/{}/database/query",
            base_url, config.project_ref
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("supamigrate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            query_url,
            config,
        })
    }

    /// The full query endpoint URL
    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    pub fn project_ref(&self) -> &str {
        &self.config.project_ref
    }
}

impl QueryExecutor for ManagementApiClient {
    fn run_query(&self, sql: &str) -> Result<QueryResponse> {
        debug!(url = %self.query_url, bytes = sql.len(), "POST query");

        let response = self
            .client
            .post(&self.query_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.access_token))
            .header(CONTENT_TYPE, "application/json")
            .json(&QueryRequest { query: sql })
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;
        debug!(status, bytes = body.len(), "query response");

        Ok(QueryResponse { status, body })
    }
}
