//! SQLite storage for roster entries.

use rusqlite::{params, Connection};
use std::path::Path;

use crate::models::RosterEntry;

pub fn open_db(path: &Path) -> anyhow::Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS makeup_exams(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id TEXT NOT NULL,
            student_name TEXT,
            class_name TEXT,
            subject TEXT NOT NULL,
            exam_date TEXT NOT NULL,
            exam_time TEXT NOT NULL,
            location TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_makeup_exams_student ON makeup_exams(student_id)",
        [],
    )?;

    Ok(conn)
}

/// Replace the whole roster in one transaction. Uploads are full overwrites:
/// either every row of the new roster lands or the previous roster survives.
pub fn replace_all(conn: &mut Connection, entries: &[RosterEntry]) -> anyhow::Result<usize> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM makeup_exams", [])?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO makeup_exams(
                student_id, student_name, class_name,
                subject, exam_date, exam_time, location, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        let created_at = chrono::Utc::now().to_rfc3339();
        for entry in entries {
            stmt.execute(params![
                entry.student_id,
                entry.student_name,
                entry.class_name,
                entry.subject,
                entry.exam_date,
                entry.exam_time,
                entry.location,
                created_at,
            ])?;
        }
    }

    tx.commit()?;
    Ok(entries.len())
}

/// All roster rows for one student, in insertion order.
pub fn exams_for_student(conn: &Connection, student_id: &str) -> anyhow::Result<Vec<RosterEntry>> {
    let mut stmt = conn.prepare(
        "SELECT student_id, student_name, class_name,
                subject, exam_date, exam_time, location
         FROM makeup_exams WHERE student_id = ?1 ORDER BY id",
    )?;

    let rows = stmt.query_map([student_id], |row| {
        Ok(RosterEntry {
            student_id: row.get(0)?,
            student_name: row.get(1)?,
            class_name: row.get(2)?,
            subject: row.get(3)?,
            exam_date: row.get(4)?,
            exam_time: row.get(5)?,
            location: row.get(6)?,
        })
    })?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}
