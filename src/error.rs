//! Error type shared by validation and configuration.
//!
//! Only structurally impossible inputs and out-of-range parameters are
//! errors. Conflicts and missing teacher mappings are penalties, never
//! errors, so the search can move through infeasible states.

use std::fmt;

/// Errors raised before an annealing run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimetableError {
    /// The problem definition cannot be optimized (no rooms, no slots,
    /// no sessions, duplicate ids, dangling references).
    MalformedProblem(String),

    /// A weight, temperature, or iteration parameter is out of range.
    InvalidConfiguration(String),
}

impl TimetableError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        TimetableError::MalformedProblem(message.into())
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        TimetableError::InvalidConfiguration(message.into())
    }
}

impl fmt::Display for TimetableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimetableError::MalformedProblem(msg) => write!(f, "malformed problem: {msg}"),
            TimetableError::InvalidConfiguration(msg) => {
                write!(f, "invalid configuration: {msg}")
            }
        }
    }
}

impl std::error::Error for TimetableError {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TimetableError>;
