//! HTTP clients for the exam API.
//!
//! [`ExamClient`] drives the student lookup flow; [`AdminClient`] covers the
//! token-guarded roster upload and the connectivity check. Both share the
//! same reqwest defaults. No request is ever retried: every failure is
//! terminal for the current operation and surfaces to the user.

mod admin;

pub use admin::{AdminClient, ADMIN_TOKEN_HEADER, ADMIN_UPLOAD_PATH};

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::models::{messages, ExamRecord};

/// Client error taxonomy.
///
/// `Validation` never reaches the network; the rest map onto the fetch
/// lifecycle: transport failure, non-2xx status, or an unparseable body.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("server returned status {0}")]
    Api(u16),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("failed to read file: {0}")]
    Io(String),
}

impl ClientError {
    /// The localized message shown in the error block.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Network(_) => messages::NETWORK_ERROR.to_string(),
            ClientError::Api(_) | ClientError::Parse(_) => messages::LOOKUP_FAILED.to_string(),
            ClientError::Io(msg) => msg.clone(),
        }
    }
}

/// Build the shared reqwest client with sensible defaults.
pub(crate) fn build_http_client(timeout: Duration) -> Result<Client, ClientError> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| ClientError::Network(format!("failed to create HTTP client: {}", e)))
}

/// Client for the student lookup API.
#[derive(Debug, Clone)]
pub struct ExamClient {
    http: Client,
    base_url: String,
}

impl ExamClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The URL queried for a given (already trimmed) student ID.
    pub fn exams_url(&self, student_id: &str) -> String {
        format!(
            "{}/api/exams/{}",
            self.base_url,
            urlencoding::encode(student_id)
        )
    }

    /// Fetch the exam records for a student.
    ///
    /// An input that is empty after trimming is rejected locally with
    /// [`ClientError::Validation`] and no request is issued.
    pub async fn fetch_exams(&self, student_id: &str) -> Result<Vec<ExamRecord>, ClientError> {
        let student_id = student_id.trim();
        if student_id.is_empty() {
            return Err(ClientError::Validation(messages::EMPTY_INPUT.to_string()));
        }

        let url = self.exams_url(student_id);
        tracing::debug!(%url, "querying exam records");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Api(response.status().as_u16()));
        }

        response
            .json::<Vec<ExamRecord>>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ExamClient {
        ExamClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected_locally() {
        for input in ["", "   ", "\t\n"] {
            match client().fetch_exams(input).await {
                Err(ClientError::Validation(msg)) => assert_eq!(msg, messages::EMPTY_INPUT),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_exams_url_escapes_the_id() {
        let client = client();
        assert_eq!(
            client.exams_url("A1234567"),
            "http://localhost:8000/api/exams/A1234567"
        );
        assert_eq!(
            client.exams_url("A 12/34"),
            "http://localhost:8000/api/exams/A%2012%2F34"
        );
    }

    #[test]
    fn test_user_messages_follow_the_taxonomy() {
        assert_eq!(
            ClientError::Validation(messages::EMPTY_INPUT.to_string()).user_message(),
            messages::EMPTY_INPUT
        );
        assert_eq!(
            ClientError::Network("connection refused".to_string()).user_message(),
            messages::NETWORK_ERROR
        );
        assert_eq!(ClientError::Api(500).user_message(), messages::LOOKUP_FAILED);
        assert_eq!(
            ClientError::Parse("expected array".to_string()).user_message(),
            messages::LOOKUP_FAILED
        );
    }
}
