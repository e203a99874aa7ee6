//! Core data structures shared by the client, server and roster parser.

mod exam;
mod query;

pub use exam::{ExamRecord, HealthStatus, RosterEntry, UploadResponse};
pub use query::{messages, QueryState};
