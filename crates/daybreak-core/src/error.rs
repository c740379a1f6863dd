//! Domain error types.
//!
//! None of these abort a running sequence or the day cycle. They are
//! returned where a caller may care and otherwise logged and dropped.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A configured object, audio clip, or dialogue link is unset or unknown.
    #[error("missing reference: {0}")]
    MissingReference(String),

    /// A per-day content table is shorter than the requested day.
    #[error("no {table} entry for day {day} ({available} configured)")]
    InvalidDayIndex {
        /// The content table that was indexed.
        table: &'static str,
        /// The 1-based day that was requested.
        day: u32,
        /// How many entries the table holds.
        available: usize,
    },

    /// A control-lock token was released twice or never issued.
    #[error("control lock token {0} already released")]
    DoubleRelease(u64),

    /// An action was requested while another action of the same gate is in flight.
    #[error("action {0} dropped: another action is in flight")]
    ReentrantAction(String),

    /// An override sequence was requested while one is already running.
    #[error("override track is busy")]
    OverrideTrackBusy,

    /// A sequence handle does not name a running sequence.
    #[error("unknown sequence {0}")]
    UnknownSequence(u64),

    /// A validation error in domain logic or content.
    #[error("validation error: {0}")]
    Validation(String),
}
