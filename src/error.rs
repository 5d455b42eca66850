//! Error types for cmdex.
//!
//! The taxonomy is narrow: an index either builds or it does
//! not, a wildcard pattern either compiles or it does not, and a search can
//! only fail when its [`SearchContext`](crate::search::context::SearchContext)
//! aborts it or when the caller hands back a snapshot that does not belong to
//! the index. An empty result is never an error.

use thiserror::Error;

/// The error type for all fallible cmdex operations.
#[derive(Debug, Error)]
pub enum CmdexError {
    /// A wildcard or glob pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// An internal invariant was violated while building the index.
    #[error("index error: {0}")]
    Index(String),

    /// A term dictionary could not be built.
    #[error("term dictionary error: {0}")]
    Fst(#[from] fst::Error),

    /// A configuration value was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The descriptors passed to a search are not the snapshot the index was built from.
    #[error("descriptor snapshot mismatch: index holds {expected} documents, got {actual}")]
    SnapshotMismatch { expected: usize, actual: usize },

    /// The search was cancelled through its context.
    #[error("search cancelled")]
    Cancelled,

    /// The search ran past the deadline set on its context.
    #[error("search deadline exceeded")]
    DeadlineExceeded,
}

impl CmdexError {
    /// Create an invalid pattern error.
    pub fn invalid_pattern<P: Into<String>, R: Into<String>>(pattern: P, reason: R) -> Self {
        CmdexError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create an index construction error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        CmdexError::Index(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        CmdexError::InvalidArgument(msg.into())
    }

    /// Create a snapshot mismatch error.
    pub fn snapshot_mismatch(expected: usize, actual: usize) -> Self {
        CmdexError::SnapshotMismatch { expected, actual }
    }

    /// Returns true if the error was raised by an aborted search context.
    pub fn is_aborted(&self) -> bool {
        matches!(self, CmdexError::Cancelled | CmdexError::DeadlineExceeded)
    }
}

/// Result type alias for cmdex operations.
pub type Result<T> = std::result::Result<T, CmdexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CmdexError::invalid_pattern("a?b", "too large");
        assert_eq!(
            err.to_string(),
            "invalid pattern 'a?b': too large"
        );

        let err = CmdexError::snapshot_mismatch(3, 2);
        assert_eq!(
            err.to_string(),
            "descriptor snapshot mismatch: index holds 3 documents, got 2"
        );
    }

    #[test]
    fn test_is_aborted() {
        assert!(CmdexError::Cancelled.is_aborted());
        assert!(CmdexError::DeadlineExceeded.is_aborted());
        assert!(!CmdexError::index("boom").is_aborted());
    }
}
