//! Error types for cycletime-core
//!
//! Two layers: `IntervalError` is the precise outcome of one interval
//! computation, `CoreError` is everything that is fatal for a story or for the
//! process. The worktime engine never recovers internally; its caller decides
//! which interval errors skip and which abort.

use thiserror::Error;

/// Outcome classification for a single interval computation.
///
/// Weekend variants are steady-state outcomes, not exceptional conditions:
/// the state machine zeroes the interval and moves on. `StartAfterEnd` is
/// always fatal for the enclosing story.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalError {
    #[error("start time is on a weekend")]
    StartOnWeekend,

    #[error("end time is on a weekend")]
    EndOnWeekend,

    #[error("start time is after end time")]
    StartAfterEnd,
}

/// Core error type for cycletime operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Configuration (process-fatal, raised once at startup)
    // ===================
    #[error("Unknown timezone: {name}")]
    UnknownTimezone { name: String },

    #[error("Invalid workday window: start hour {start_hour} must be before end hour {end_hour} (max 23)")]
    InvalidWorkdayWindow { start_hour: u32, end_hour: u32 },

    // ===================
    // Per-story fatal errors
    // ===================
    #[error("Malformed transition timestamp: {value}")]
    TimestampParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Story {story_id}: interval start {start} is after end {end}")]
    InvertedInterval {
        story_id: u64,
        start: String,
        end: String,
    },

    // ===================
    // Tracker API errors
    // ===================
    #[error("Request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
}

impl CoreError {
    /// True for errors that abort a single story's computation but leave the
    /// rest of the batch intact.
    pub fn is_story_fatal(&self) -> bool {
        matches!(
            self,
            CoreError::TimestampParse { .. } | CoreError::InvertedInterval { .. }
        )
    }
}
