//! Remote query execution port
//!
//! Abstracts the Management API's query endpoint: one authenticated POST
//! carrying a SQL string, answered with a status code and a raw body.

use crate::domain::result::Result;

/// Status the query endpoint returns when a query executed
pub const SUCCESS_STATUS: u16 = 201;

/// Raw answer from the query endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    pub status: u16,
    pub body: String,
}

impl QueryResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the query executed. Any other status is a failure.
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }

    /// Human-readable error text: the body's `message` field when present,
    /// otherwise the raw body
    pub fn error_message(&self) -> String {
        let parsed: Option<serde_json::Value> = serde_json::from_str(&self.body).ok();
        match parsed.as_ref().and_then(|v| v.get("message")) {
            Some(serde_json::Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => self.body.clone(),
        }
    }
}

/// Executes SQL against the remote project
///
/// Implementations return `Ok` for every HTTP response, whatever its status.
/// `Err` is reserved for transport failures where no response was received.
pub trait QueryExecutor {
    fn run_query(&self, sql: &str) -> Result<QueryResponse>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn run_query(&self, sql: &str) -> Result<QueryResponse> {
        (**self).run_query(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_201_is_success() {
        assert!(QueryResponse::new(201, "[]").is_success());
        assert!(!QueryResponse::new(200, "[]").is_success());
        assert!(!QueryResponse::new(400, "{}").is_success());
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        let resp = QueryResponse::new(400, r#"{"message":"relation \"users\" already exists"}"#);
        assert_eq!(resp.error_message(), r#"relation "users" already exists"#);
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        let resp = QueryResponse::new(502, "Bad Gateway");
        assert_eq!(resp.error_message(), "Bad Gateway");

        let resp = QueryResponse::new(400, r#"{"error":"nope"}"#);
        assert_eq!(resp.error_message(), r#"{"error":"nope"}"#);

        let resp = QueryResponse::new(400, r#"["not", "an", "object"]"#);
        assert_eq!(resp.error_message(), r#"["not", "an", "object"]"#);
    }

    #[test]
    fn test_error_message_non_string_field() {
        let resp = QueryResponse::new(400, r#"{"message":{"code":"42P07"}}"#);
        assert_eq!(resp.error_message(), r#"{"code":"42P07"}"#);
    }
}
