//! Structural error definitions.
//!
//! Registration mistakes (unknown states, malformed patterns, unknown special
//! codes) are reported as [`RouterError`]. Runtime negatives such as "state
//! already exists" or "transition vetoed" are plain `bool` results and never
//! show up here.

use thiserror::Error;

/// Errors raised by the registration API and the navigation boundary.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A route was bound to a state that is not in the graph.
    #[error("Non-existent state: {0}")]
    UnknownState(String),

    /// The same variable name appears twice in one pattern.
    #[error("Duplicate path id `{name}` in pattern `{pattern}`")]
    DuplicatePathId { pattern: String, name: String },

    /// A `:`-prefixed segment does not follow `:name` or `:name[KIND]`.
    #[error("Invalid variable segment `{segment}` in pattern `{pattern}`")]
    InvalidSegment { pattern: String, segment: String },

    /// Special route code other than 403, 404 or 500.
    #[error("Invalid special route code: {0}")]
    InvalidSpecialCode(u16),

    /// `listen` was called on a router built without a navigation source.
    #[error("No navigation source configured")]
    NoSource,

    /// Reading or writing the navigation location failed.
    #[error("Navigation source error: {0}")]
    Navigation(#[from] std::io::Error),

    /// The file-backed navigation source could not install its watcher.
    #[error("Navigation watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;
