//! Precondition failures and process exit codes.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a whole operation before any output is written
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Aggregate file not found: {}", .0.display())]
    AggregateNotFound(PathBuf),

    #[error("Rules file not found: {}", .0.display())]
    RulesNotFound(PathBuf),

    #[error("Failed to read rules file {}: {source}", .path.display())]
    UnreadableRules {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse rules JSON: {0}")]
    InvalidRules(#[from] serde_json::Error),

    #[error("Rules JSON must be an object mapping tokens to replacements")]
    RulesNotObject,

    #[error("Replacement for token {token:?} must be a string")]
    NonStringReplacement { token: String },
}

/// Exit codes of the `compose` binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Completed, possibly with skipped items
    Success = 0,
    /// A precondition failed or an unexpected I/O error occurred
    Failure = 1,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
