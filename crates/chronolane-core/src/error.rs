use chrono::NaiveDate;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid calendar date: {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    #[error("Invalid timeline config: {message}")]
    InvalidConfig { message: String },

    #[error("Event data JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
