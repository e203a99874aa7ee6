//! The REST service backing the lookup page.
//!
//! Three routes: the student query API, the token-guarded roster upload and
//! the health check. Storage is a single SQLite database; an upload replaces
//! the whole roster.

mod auth;
mod store;

pub use auth::{generate_token, resolve_admin_token, verify_token, AuthError};
pub use store::{exams_for_student, open_db, replace_all};

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::{Arc, Mutex};

use crate::client::ADMIN_TOKEN_HEADER;
use crate::models::{ExamRecord, UploadResponse};
use crate::roster;

/// Shared state of the service.
#[derive(Debug)]
pub struct AppState {
    pub db: Mutex<rusqlite::Connection>,
    pub admin_token: String,
}

impl AppState {
    pub fn new(db: rusqlite::Connection, admin_token: String) -> Arc<Self> {
        Arc::new(Self {
            db: Mutex::new(db),
            admin_token,
        })
    }
}

/// API error rendered as `{"detail": "..."}` with the matching status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/exams/:student_id", get(student_exams))
        .route("/admin/upload", post(admin_upload))
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(bind_addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// Exam records for one student: masked name, no class, roster order.
async fn student_exams(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<ExamRecord>>, ApiError> {
    let db = state
        .db
        .lock()
        .map_err(|_| ApiError::internal("database unavailable"))?;
    let entries = store::exams_for_student(&db, &student_id)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let records = entries
        .into_iter()
        .map(|entry| ExamRecord {
            subject: entry.subject,
            exam_date: entry.exam_date,
            exam_time: entry.exam_time,
            location: entry.location,
            student_name: mask_name(entry.student_name.as_deref()),
        })
        .collect();

    Ok(Json(records))
}

/// Ingest a roster workbook: verify token, validate the file, parse, then
/// replace the stored roster in one transaction.
async fn admin_upload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let presented = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    verify_token(&state.admin_token, presented)?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            upload = Some((file_name, bytes.to_vec()));
        }
    }

    let (file_name, bytes) = upload
        .ok_or_else(|| ApiError::bad_request("請上傳 Excel 檔案 (.xlsx 或 .xls)"))?;

    let lower = file_name.to_lowercase();
    if !(lower.ends_with(".xlsx") || lower.ends_with(".xls")) {
        return Err(ApiError::bad_request("請上傳 Excel 檔案 (.xlsx 或 .xls)"));
    }

    // Workbook parsing is CPU-bound; keep it off the async worker.
    let entries = tokio::task::spawn_blocking(move || roster::parse_workbook(&bytes))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .map_err(|e| ApiError::bad_request(format!("解析失敗: {}", e)))?;

    if entries.is_empty() {
        return Err(ApiError::bad_request("Excel 檔案中沒有有效資料"));
    }

    let count = {
        let mut db = state
            .db
            .lock()
            .map_err(|_| ApiError::internal("database unavailable"))?;
        store::replace_all(&mut db, &entries)
            .map_err(|e| ApiError::internal(format!("上傳失敗: {}", e)))?
    };

    tracing::info!(count, file = %file_name, "roster replaced");

    Ok(Json(UploadResponse {
        success: true,
        count: Some(count as u32),
        message: Some(format!("成功上傳 {} 筆補考資料", count)),
        detail: None,
    }))
}

/// Mask the middle characters of a name.
///
/// 1 char is kept as-is, 2 chars keep the first, longer names keep the first
/// and last. Empty or whitespace-only input yields `None`.
pub fn mask_name(name: Option<&str>) -> Option<String> {
    let name = name?.trim();
    if name.is_empty() {
        return None;
    }

    let chars: Vec<char> = name.chars().collect();
    match chars.len() {
        1 => Some(name.to_string()),
        2 => Some(format!("{}○", chars[0])),
        n => {
            let middle = "○".repeat(n - 2);
            Some(format!("{}{}{}", chars[0], middle, chars[n - 1]))
        }
    }
}
