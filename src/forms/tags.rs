use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::tag::NewTag;
use crate::domain::types::{TagName, TypeConstraintError};

#[derive(Deserialize, Validate)]
pub struct TagForm {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagFormPayload {
    pub name: TagName,
}

impl TagFormPayload {
    pub fn to_new_tag(&self, now: NaiveDateTime) -> NewTag {
        NewTag {
            name: self.name.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum TagFormError {
    #[error("Tag form validation failed: {0}")]
    Validation(String),
    #[error("Tag form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for TagFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for TagFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<TagForm> for TagFormPayload {
    type Error = TagFormError;

    fn try_from(value: TagForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: TagName::new(value.name)?,
        })
    }
}
