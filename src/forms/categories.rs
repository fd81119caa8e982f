use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{CategoryChanges, NewCategory};
use crate::domain::types::{CategoryId, CategoryName, TypeConstraintError};

#[derive(Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub seo_desc: String,
    /// Missing or `0` creates a root category.
    #[serde(default)]
    pub parent_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFormPayload {
    pub name: CategoryName,
    pub seo_desc: String,
    pub parent_id: Option<CategoryId>,
}

impl CategoryFormPayload {
    pub fn to_new_category(&self, now: NaiveDateTime) -> NewCategory {
        NewCategory {
            name: self.name.clone(),
            seo_desc: self.seo_desc.clone(),
            parent_id: self.parent_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_changes(&self, now: NaiveDateTime) -> CategoryChanges {
        CategoryChanges {
            name: self.name.clone(),
            seo_desc: self.seo_desc.clone(),
            parent_id: self.parent_id,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let parent_id = match value.parent_id {
            None | Some(0) => None,
            Some(id) => Some(CategoryId::new(id)?),
        };

        Ok(Self {
            name: CategoryName::new(value.name)?,
            seo_desc: value.seo_desc.trim().to_string(),
            parent_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_parent_creates_a_root() {
        let payload = CategoryFormPayload::try_from(CategoryForm {
            name: "Rust".into(),
            seo_desc: " systems ".into(),
            parent_id: Some(0),
        })
        .unwrap();
        assert_eq!(payload.parent_id, None);
        assert_eq!(payload.seo_desc, "systems");
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = CategoryFormPayload::try_from(CategoryForm {
            name: "   ".into(),
            seo_desc: String::new(),
            parent_id: None,
        })
        .unwrap_err();
        assert!(matches!(err, CategoryFormError::TypeConstraint(_)));
    }
}
