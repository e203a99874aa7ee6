//! Exam record models.
//!
//! The backend serves a flat list of exam rows per student. The shapes here
//! are validated at the boundary: unknown JSON fields are ignored, missing
//! optional fields become `None`.

use serde::{Deserialize, Serialize};

/// One make-up exam row as served to students.
///
/// `student_name` is masked server-side before it leaves the API and is
/// absent when the roster carried no name for the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    /// Subject of the make-up exam
    pub subject: String,

    /// Exam date, kept in the roster's original format (e.g. "2月6日")
    pub exam_date: String,

    /// Exam time slot (e.g. "08:00-08:50")
    pub exam_time: String,

    /// Exam room (e.g. "篤行樓209教室")
    pub location: String,

    /// Masked student name, shown as a header line above the result table
    #[serde(default)]
    pub student_name: Option<String>,
}

/// One parsed roster row, as uploaded by the registrar and stored by the
/// server. Unlike [`ExamRecord`] this carries the unmasked name and the
/// class, neither of which is ever exposed through the student API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub student_id: String,
    pub student_name: Option<String>,
    pub class_name: Option<String>,
    pub subject: String,
    pub exam_date: String,
    pub exam_time: String,
    pub location: String,
}

/// JSON body returned by the admin upload endpoint.
///
/// Success responses carry `count` and `message`; error responses carry
/// `detail`. All fields default so a partial body still deserializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,

    /// Number of roster rows ingested
    #[serde(default)]
    pub count: Option<u32>,

    #[serde(default)]
    pub message: Option<String>,

    /// Server-provided error detail on failure
    #[serde(default)]
    pub detail: Option<String>,
}

impl UploadResponse {
    /// The human-facing failure text: the server detail when present,
    /// otherwise a generic message.
    pub fn failure_detail(&self) -> String {
        self.detail
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "上傳失敗".to_string())
    }
}

/// Body of the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
