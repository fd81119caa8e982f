//! Content operations invoked by the request-handling layer.
//!
//! Every function is generic over the repository traits it needs, so the
//! same logic runs against [`crate::repository::DieselRepository`] and the
//! in-memory test repository.

use crate::repository::RepositoryError;

pub mod articles;
pub mod categories;
pub mod errors;
pub mod tags;
pub mod views;

pub use errors::{ServiceError, ServiceResult};

/// Converts a repository failure for the caller, logging it when the
/// storage backend itself failed.
pub(crate) fn repo_failure(action: &str, e: RepositoryError) -> ServiceError {
    if matches!(
        e,
        RepositoryError::DatabaseError(_) | RepositoryError::ConnectionError(_)
    ) {
        log::error!("Failed to {action}: {e}");
    }
    e.into()
}
