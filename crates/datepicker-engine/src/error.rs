//! Error types for datepicker-engine operations.
//!
//! Most engine operations never fail: unparseable input normalizes to `None`,
//! clicks on disabled dates are ignored, and runaway recurrences are capped.
//! The variants here cover the cases that must surface to the caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatepickerError {
    /// A named date-library adapter was requested but never registered.
    #[error("Date adapter not available: {0}")]
    AdapterMissing(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// An exported value could not be read back.
    #[error("{format} import error: {message}")]
    Import {
        format: &'static str,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DatepickerError>;
