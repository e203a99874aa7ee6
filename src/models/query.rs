//! Query lifecycle state for the lookup flow.

use super::ExamRecord;

/// User-facing strings for the lookup flow.
pub mod messages {
    /// Shown when the submitted student ID is empty after trimming
    pub const EMPTY_INPUT: &str = "請輸入學號";

    /// Generic retry message for non-2xx responses
    pub const LOOKUP_FAILED: &str = "查詢失敗，請稍後再試";

    /// Shown when the request itself fails (DNS, refused connection, timeout)
    pub const NETWORK_ERROR: &str = "網路錯誤，請檢查連線";

    /// Shown while a query is in flight
    pub const SEARCHING: &str = "查詢中，請稍候...";

    /// Shown for a 2xx response with zero records
    pub const NO_RECORDS: &str = "查無此學號的補考資料";

    /// Hint line under the empty-result message
    pub const NO_RECORDS_HINT: &str = "請確認輸入的學號是否正確，或該學號目前無補考紀錄。";
}

/// State of one lookup query. Exactly one variant holds at any time and
/// transitions are driven solely by the fetch lifecycle: a submission moves
/// to `Loading`, the response moves to `Error`, `Empty` or `Populated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    /// No query submitted yet
    Idle,

    /// A query is in flight
    Loading,

    /// Validation or fetch failure, with the message to display
    Error(String),

    /// The server answered with zero records for this student
    Empty,

    /// The server answered with at least one record, in response order
    Populated(Vec<ExamRecord>),
}

impl QueryState {
    /// Map a successful response body to the terminal state.
    pub fn from_records(records: Vec<ExamRecord>) -> Self {
        if records.is_empty() {
            QueryState::Empty
        } else {
            QueryState::Populated(records)
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryState::Error(_))
    }
}
