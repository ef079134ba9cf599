//! Error kinds surfaced by the [`Operator`](crate::operator::Operator).

use crate::db::DbError;
use crate::operator::ResolvedPath;
use thiserror::Error;

/// Errors returned by Operator calls.
///
/// A denied call never says whether its target exists.
#[derive(Debug, Error)]
pub enum OperatorError {
    #[error("insufficient privileges")]
    PermissionDenied,

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Storage failure, passed through unchanged.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl OperatorError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::InvalidPath(_) => "invalid_path",
            Self::Storage(e) if e.is_not_found() => "not_found",
            Self::Storage(_) => "storage_error",
        }
    }
}

/// Result type for Operator calls.
pub type OperatorResult<T> = Result<T, OperatorError>;

/// Path resolution failure, carrying the entities resolved before it.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct PathError {
    pub resolved: ResolvedPath,
    #[source]
    pub source: OperatorError,
}

impl PathError {
    pub(crate) fn new(resolved: ResolvedPath, source: OperatorError) -> Self {
        Self { resolved, source }
    }

    /// The underlying error kind.
    pub fn kind(&self) -> &OperatorError {
        &self.source
    }
}
