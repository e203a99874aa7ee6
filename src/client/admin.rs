//! Admin-side client: roster upload and connectivity check.
//!
//! The uploader takes a workbook file path and performs the authenticated
//! POST itself, decoupled from any spreadsheet host. The connectivity check
//! derives its health URL from the upload URL by path substitution.

use reqwest::multipart;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

use super::{build_http_client, ClientError};
use crate::models::{HealthStatus, UploadResponse};

/// Header carrying the shared admin secret
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Path of the upload endpoint within the admin URL
pub const ADMIN_UPLOAD_PATH: &str = "/admin/upload";

/// Client for the admin upload endpoint and the health check.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    upload_url: String,
    token: String,
}

impl AdminClient {
    /// Build a client for the given upload URL. Only http/https URLs are
    /// accepted; anything else is a configuration mistake, not a request to
    /// make.
    pub fn new(upload_url: &str, token: &str, timeout: Duration) -> Result<Self, ClientError> {
        let parsed = url::Url::parse(upload_url)
            .map_err(|e| ClientError::Validation(format!("invalid admin URL: {}", e)))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ClientError::Validation(format!(
                    "invalid admin URL scheme: {}",
                    other
                )))
            }
        }

        Ok(Self {
            http: build_http_client(timeout)?,
            upload_url: upload_url.to_string(),
            token: token.to_string(),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Health URL derived from the upload URL by substring replacement.
    pub fn health_url(&self) -> String {
        self.upload_url.replace(ADMIN_UPLOAD_PATH, "/health")
    }

    /// Upload a workbook file to the admin endpoint.
    ///
    /// The file extension is checked before any network call. The JSON body
    /// is parsed regardless of HTTP status so that a structured error
    /// `detail` from the server survives; callers inspect
    /// [`UploadResponse::success`].
    pub async fn upload_workbook(&self, path: &Path) -> Result<UploadResponse, ClientError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if !is_workbook_name(&file_name) {
            return Err(ClientError::Validation(
                "請上傳 Excel 檔案 (.xlsx 或 .xls)".to_string(),
            ));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::Io(format!("{}: {}", path.display(), e)))?;

        tracing::info!(
            file = %path.display(),
            bytes = bytes.len(),
            url = %self.upload_url,
            "uploading roster workbook"
        );

        let part = multipart::Part::bytes(bytes).file_name(file_name);
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&self.upload_url)
            .header(ADMIN_TOKEN_HEADER, &self.token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        match response.json::<UploadResponse>().await {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => Err(ClientError::Api(status.as_u16())),
            Err(e) => Err(ClientError::Parse(e.to_string())),
        }
    }

    /// GET the derived health endpoint and report reachability.
    pub async fn check_health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.health_url();
        tracing::debug!(%url, "checking connectivity");

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
            .json::<HealthStatus>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

fn is_workbook_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".xlsx") || lower.ends_with(".xls")
}
