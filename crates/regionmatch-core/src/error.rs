// crates/regionmatch-core/src/error.rs
use thiserror::Error;

/// Errors produced while loading a gazetteer or driving the resolver.
///
/// An input that cannot be matched is *not* an error: it comes back as an
/// unresolved level inside a [`crate::ResolutionResult`].
#[derive(Debug, Error)]
pub enum GazetteerError {
    /// Reference data violates a structural invariant (unknown parent,
    /// duplicate sibling name, duplicate id, ...). The load is aborted.
    #[error("malformed gazetteer at row {row}: {reason}")]
    MalformedGazetteer { row: usize, reason: String },

    /// The resolver was invoked against a parent the current store does not
    /// know about. Indicates a caller bug.
    #[error("invalid hierarchy state: {0}")]
    InvalidHierarchyState(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),
}

impl GazetteerError {
    pub(crate) fn malformed(row: usize, reason: impl Into<String>) -> Self {
        GazetteerError::MalformedGazetteer {
            row,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GazetteerError>;
