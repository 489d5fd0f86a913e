//! Error types for schedule-engine operations.

use thiserror::Error;

use crate::reschedule::ConflictWarning;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid event: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(Box<ConflictWarning>),

    #[error("Not movable: {0}")]
    NotMovable(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Event store error: {0}")]
    Store(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),
}

impl From<std::io::Error> for ScheduleError {
    fn from(err: std::io::Error) -> Self {
        ScheduleError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        ScheduleError::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
