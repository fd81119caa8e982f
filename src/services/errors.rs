use thiserror::Error;

/// Error type returned by the content operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The record does not exist or is not visible to the caller.
    #[error("not found")]
    NotFound,
    /// Caller supplied malformed input.
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    /// The operation would break a consistency rule, such as deleting a
    /// category that still has children.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The storage backend failed; not retried here.
    #[error("storage failure")]
    StorageFailure,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
