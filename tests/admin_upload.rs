//! Admin upload and connectivity check against the in-process service.

mod common;

use common::{entry, roster_workbook, spawn_server, FULL_HEADERS};
use makeup_exam::client::{AdminClient, ExamClient};
use makeup_exam::roster::TARGET_SHEET;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn write_workbook(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn sample_workbook() -> Vec<u8> {
    roster_workbook(
        TARGET_SHEET,
        &FULL_HEADERS,
        &[
            vec!["101", "A1234567", "王小明", "王小明", "數學", "2月6日", "08:00-08:50", "篤行樓209教室"],
            vec!["101", "A1234567", "王小明", "王小明", "英文", "2月6日", "09:00-09:50", "篤行樓209教室"],
            vec!["102", "B7654321", "陳大文", "陳大文", "物理", "2月7日", "08:00-08:50", "篤行樓210教室"],
        ],
    )
}

#[tokio::test]
async fn test_upload_without_token_is_rejected() {
    let (base_url, dir) = spawn_server("secret", &[]).await;
    let path = write_workbook(&dir, "roster.xlsx", &sample_workbook());

    let admin = AdminClient::new(&format!("{}/admin/upload", base_url), "", TIMEOUT).unwrap();
    let response = admin.upload_workbook(&path).await.unwrap();

    assert!(!response.success);
    assert_eq!(response.failure_detail(), "未提供驗證 token");
}

#[tokio::test]
async fn test_upload_with_wrong_token_is_rejected_and_changes_nothing() {
    let (base_url, dir) = spawn_server(
        "secret",
        &[entry("A1234567", None, "化學", "2月1日", "08:00", "101")],
    )
    .await;
    let path = write_workbook(&dir, "roster.xlsx", &sample_workbook());

    let admin = AdminClient::new(&format!("{}/admin/upload", base_url), "wrong", TIMEOUT).unwrap();
    let response = admin.upload_workbook(&path).await.unwrap();

    assert!(!response.success);
    assert_eq!(response.failure_detail(), "驗證 token 無效");

    // The previously seeded roster must survive a rejected upload.
    let client = ExamClient::new(&base_url, TIMEOUT).unwrap();
    let records = client.fetch_exams("A1234567").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].subject, "化學");
}

#[tokio::test]
async fn test_upload_replaces_the_whole_roster() {
    let (base_url, dir) = spawn_server("secret", &[]).await;
    let upload_url = format!("{}/admin/upload", base_url);
    let admin = AdminClient::new(&upload_url, "secret", TIMEOUT).unwrap();
    let client = ExamClient::new(&base_url, TIMEOUT).unwrap();

    let path = write_workbook(&dir, "roster.xlsx", &sample_workbook());
    let response = admin.upload_workbook(&path).await.unwrap();
    assert!(response.success);
    assert_eq!(response.count, Some(3));
    assert_eq!(response.message.as_deref(), Some("成功上傳 3 筆補考資料"));

    assert_eq!(client.fetch_exams("A1234567").await.unwrap().len(), 2);
    assert_eq!(client.fetch_exams("B7654321").await.unwrap().len(), 1);

    // A second upload is a full overwrite, not a merge.
    let second = roster_workbook(
        TARGET_SHEET,
        &FULL_HEADERS,
        &[vec!["103", "C0000001", "林三", "林三", "歷史", "2月8日", "10:00-10:50", "篤行樓211教室"]],
    );
    let path = write_workbook(&dir, "roster2.xlsx", &second);
    let response = admin.upload_workbook(&path).await.unwrap();
    assert!(response.success);
    assert_eq!(response.count, Some(1));

    assert!(client.fetch_exams("A1234567").await.unwrap().is_empty());
    assert_eq!(client.fetch_exams("C0000001").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_upload_of_unparseable_workbook_reports_parse_failure() {
    let (base_url, dir) = spawn_server("secret", &[]).await;
    let path = write_workbook(&dir, "broken.xlsx", b"definitely not a workbook");

    let admin = AdminClient::new(&format!("{}/admin/upload", base_url), "secret", TIMEOUT).unwrap();
    let response = admin.upload_workbook(&path).await.unwrap();

    assert!(!response.success);
    assert!(response.failure_detail().starts_with("解析失敗"));
}

#[tokio::test]
async fn test_upload_of_empty_roster_is_rejected() {
    let (base_url, dir) = spawn_server("secret", &[]).await;
    let workbook = roster_workbook(TARGET_SHEET, &FULL_HEADERS, &[]);
    let path = write_workbook(&dir, "empty.xlsx", &workbook);

    let admin = AdminClient::new(&format!("{}/admin/upload", base_url), "secret", TIMEOUT).unwrap();
    let response = admin.upload_workbook(&path).await.unwrap();

    assert!(!response.success);
    assert_eq!(response.failure_detail(), "Excel 檔案中沒有有效資料");
}

#[tokio::test]
async fn test_server_rejects_non_workbook_filename() {
    // The CLI refuses .csv before sending; drive the endpoint directly to
    // check the server-side validation as well.
    let (base_url, _dir) = spawn_server("secret", &[]).await;

    let part = reqwest::multipart::Part::bytes(b"a,b,c".to_vec()).file_name("roster.csv");
    let form = reqwest::multipart::Form::new().part("file", part);
    let response = reqwest::Client::new()
        .post(format!("{}/admin/upload", base_url))
        .header("X-Admin-Token", "secret")
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "請上傳 Excel 檔案 (.xlsx 或 .xls)");
}

#[tokio::test]
async fn test_connectivity_check_against_running_service() {
    let (base_url, _dir) = spawn_server("secret", &[]).await;

    let admin = AdminClient::new(&format!("{}/admin/upload", base_url), "", TIMEOUT).unwrap();
    assert_eq!(admin.health_url(), format!("{}/health", base_url));

    let health = admin.check_health().await.unwrap();
    assert!(health.is_healthy());
}

#[tokio::test]
async fn test_connectivity_check_against_dead_service_fails() {
    let admin = AdminClient::new("http://127.0.0.1:1/admin/upload", "", TIMEOUT).unwrap();
    assert!(admin.check_health().await.is_err());
}
