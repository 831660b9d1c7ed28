//! Error types for the NFL notifier
//!
//! This module defines all error types used throughout the library.
//! Structural failures (missing content root, bad config, auth) are fatal;
//! per-element parse problems never surface here, they just skip the element.

use thiserror::Error;

/// Error type for NFL notifier operations
#[derive(Error, Debug)]
pub enum NotifierError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Schedule page returned a non-success status
    #[error("schedule page unavailable (HTTP {status})")]
    PageUnavailable { status: u16 },

    /// The structural marker for the schedule content was not found
    #[error("page structure not found: {0}")]
    StructureNotFound(String),

    /// Failed to parse HTML content
    #[error("failed to parse HTML: {0}")]
    Parse(String),

    /// A date or time string could not be parsed
    #[error("failed to parse date: {0}")]
    DateParse(String),

    /// The page yielded games but no season, gameday or date to anchor them
    #[error("incomplete schedule: {0}")]
    IncompleteSchedule(String),

    /// Calendar authentication failed or credentials are missing
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The calendar API rejected an event creation request
    #[error("event creation failed (HTTP {status}): {message}")]
    Publish { status: u16, message: String },

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error (token file, log file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for NFL notifier operations
pub type Result<T> = std::result::Result<T, NotifierError>;
