//! Roster workbook parsing.
//!
//! The registrar's workbook carries one sheet per export view; only the
//! "應到考名單 (班級座號序)" sheet is ingested. Every cell is read as a
//! string and trimmed, matching how the roster is maintained by hand.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use thiserror::Error;

use crate::models::RosterEntry;

/// Worksheet the roster rows are read from
pub const TARGET_SHEET: &str = "應到考名單 (班級座號序)";

/// Columns that must be present in the header row
pub const REQUIRED_COLUMNS: [&str; 5] = ["學號", "補考科目", "補考日期", "補考時間", "補考教室"];

/// Roster parsing errors, phrased for the admin-facing failure dialog.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("無法讀取 Excel 檔案: {0}")]
    Workbook(String),

    #[error("無法找到工作表「{TARGET_SHEET}」: {0}")]
    MissingSheet(String),

    #[error("缺少必要欄位: {0}")]
    MissingColumns(String),
}

/// Parse workbook bytes into roster entries.
///
/// Rows with an empty 學號 cell are skipped. The 姓名1 column is preferred
/// over 姓名 when both exist; 班級 is optional.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<RosterEntry>, RosterError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| RosterError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range(TARGET_SHEET)
        .map_err(|e| RosterError::MissingSheet(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| RosterError::MissingColumns(REQUIRED_COLUMNS.join(", ")))?;
    let headers: Vec<String> = header.iter().map(cell_text).collect();

    let column = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| column(name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(RosterError::MissingColumns(missing.join(", ")));
    }

    let id_col = column("學號").unwrap();
    let subject_col = column("補考科目").unwrap();
    let date_col = column("補考日期").unwrap();
    let time_col = column("補考時間").unwrap();
    let location_col = column("補考教室").unwrap();
    let name_col = column("姓名1").or_else(|| column("姓名"));
    let class_col = column("班級");

    let mut entries = Vec::new();
    for row in rows {
        let student_id = cell_at(row, id_col);
        if student_id.is_empty() {
            continue;
        }

        entries.push(RosterEntry {
            student_id,
            student_name: name_col.map(|c| cell_at(row, c)).filter(|s| !s.is_empty()),
            class_name: class_col.map(|c| cell_at(row, c)).filter(|s| !s.is_empty()),
            subject: cell_at(row, subject_col),
            exam_date: cell_at(row, date_col),
            exam_time: cell_at(row, time_col),
            location: cell_at(row, location_col),
        });
    }

    tracing::debug!(rows = entries.len(), "parsed roster workbook");
    Ok(entries)
}

fn cell_at(row: &[Data], index: usize) -> String {
    row.get(index).map(cell_text).unwrap_or_default()
}

/// Stringify a cell the way the roster is read: everything as trimmed text,
/// numeric cells without a trailing ".0".
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}
