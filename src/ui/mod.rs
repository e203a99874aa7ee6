//! Terminal rendering for the lookup flow.
//!
//! [`render_query_state`] is a pure mapping from a [`QueryState`] to exactly
//! one text block, so the state-to-output selection is testable without a
//! terminal. Color and the live spinner are applied at the printing layer.

use comfy_table::{presets, Table};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::models::{messages, ExamRecord, QueryState};

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Loading,
    Upload,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Loading => "◐",
        Status::Upload => "↑",
    }
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Error => println!("{} {}", icon.red().bold(), msg),
        Status::Warning => println!("{} {}", icon.yellow().bold(), msg),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
        Status::Loading => println!("{} {}", icon.cyan(), msg),
        Status::Upload => println!("{} {}", icon.blue(), msg),
    }
}

/// Render a query state as exactly one text block.
///
/// `Idle` renders nothing (no query has been submitted), `Populated` renders
/// the table with an optional name header; the other states render their
/// icon and message lines.
pub fn render_query_state(state: &QueryState) -> String {
    match state {
        QueryState::Idle => String::new(),
        QueryState::Loading => format!("{} {}", status_icon(Status::Loading), messages::SEARCHING),
        QueryState::Error(msg) => format!("{} {}", status_icon(Status::Warning), msg),
        QueryState::Empty => format!(
            "{} {}\n{}",
            status_icon(Status::Info),
            messages::NO_RECORDS,
            messages::NO_RECORDS_HINT
        ),
        QueryState::Populated(records) => {
            let mut block = String::new();
            if let Some(name) = records.first().and_then(|r| r.student_name.as_deref()) {
                block.push_str(&format!("姓名：{}\n", name));
            }
            block.push_str(&exam_table(records).to_string());
            block
        }
    }
}

/// The exam result table: one row per record, in response order.
pub fn exam_table(records: &[ExamRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(vec!["科目", "日期", "時間", "地點"]);

    for record in records {
        table.add_row(vec![
            record.subject.clone(),
            record.exam_date.clone(),
            record.exam_time.clone(),
            record.location.clone(),
        ]);
    }

    table
}
