//! Error conversion glue between the domain, repository, form and service
//! layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::forms::articles::ArticleFormError;
use crate::forms::categories::CategoryFormError;
use crate::forms::tags::TagFormError;
use crate::repository::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::ValidationFailed(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ValidationError(message) => ServiceError::ValidationFailed(message),
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            RepositoryError::DatabaseError(_) | RepositoryError::ConnectionError(_) => {
                ServiceError::StorageFailure
            }
        }
    }
}

impl From<ArticleFormError> for ServiceError {
    fn from(val: ArticleFormError) -> Self {
        ServiceError::ValidationFailed(val.to_string())
    }
}

impl From<CategoryFormError> for ServiceError {
    fn from(val: CategoryFormError) -> Self {
        ServiceError::ValidationFailed(val.to_string())
    }
}

impl From<TagFormError> for ServiceError {
    fn from(val: TagFormError) -> Self {
        ServiceError::ValidationFailed(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_collapse_into_storage_failure() {
        assert_eq!(
            ServiceError::from(RepositoryError::ConnectionError("pool timed out".into())),
            ServiceError::StorageFailure
        );
        assert_eq!(
            ServiceError::from(RepositoryError::DatabaseError("disk I/O error".into())),
            ServiceError::StorageFailure
        );
    }

    #[test]
    fn constraint_errors_keep_their_message() {
        assert_eq!(
            ServiceError::from(RepositoryError::Conflict("slug taken".into())),
            ServiceError::Conflict("slug taken".into())
        );
        assert_eq!(
            ServiceError::from(TypeConstraintError::InvalidSlug),
            ServiceError::ValidationFailed("slug may not contain whitespace or '/'".into())
        );
    }
}
