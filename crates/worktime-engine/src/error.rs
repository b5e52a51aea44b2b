//! Error types for worktime-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkTimeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimeZone(String),

    #[error("No schedule for day: {0}")]
    NoScheduleForDay(String),

    #[error("The business is open right now; there is no next opening to compute")]
    NotWorkingNow,
}

pub type Result<T> = std::result::Result<T, WorkTimeError>;
