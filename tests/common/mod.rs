//! Shared helpers for the integration tests: an in-process service bound to
//! an ephemeral port and a roster workbook builder.

// Not every test file uses every helper.
#![allow(dead_code)]

use makeup_exam::models::RosterEntry;
use makeup_exam::server::{self, AppState};
use tempfile::TempDir;

/// Spin up the service on 127.0.0.1:0 with a seeded roster.
///
/// Returns the base URL and the scratch dir holding the database (kept alive
/// for the duration of the test).
pub async fn spawn_server(admin_token: &str, entries: &[RosterEntry]) -> (String, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut db = server::open_db(&dir.path().join("exam.sqlite3")).unwrap();
    if !entries.is_empty() {
        server::replace_all(&mut db, entries).unwrap();
    }

    let state = AppState::new(db, admin_token.to_string());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, server::router(state)).await.unwrap();
    });

    (format!("http://{}", addr), dir)
}

pub fn entry(
    student_id: &str,
    student_name: Option<&str>,
    subject: &str,
    exam_date: &str,
    exam_time: &str,
    location: &str,
) -> RosterEntry {
    RosterEntry {
        student_id: student_id.to_string(),
        student_name: student_name.map(|n| n.to_string()),
        class_name: None,
        subject: subject.to_string(),
        exam_date: exam_date.to_string(),
        exam_time: exam_time.to_string(),
        location: location.to_string(),
    }
}

/// Build a workbook whose roster sheet has the given header row and rows.
pub fn roster_workbook(sheet_name: &str, headers: &[&str], rows: &[Vec<&str>]) -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).unwrap();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            sheet
                .write_string((row_idx + 1) as u32, col as u16, *value)
                .unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// The standard header layout used by the registrar's export.
pub const FULL_HEADERS: [&str; 8] = [
    "班級", "學號", "姓名1", "姓名", "補考科目", "補考日期", "補考時間", "補考教室",
];
