use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::article::{ArticleChanges, NewArticle};
use crate::domain::types::{ArticleSlug, ArticleTitle, CategoryId, TagId, TypeConstraintError};

/// Raw article input as submitted by an author.
#[derive(Deserialize, Validate)]
pub struct ArticleForm {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub slug: String,
    #[serde(default)]
    pub content: String,
    /// `0` leaves the article uncategorized.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub category_id: i32,
    #[serde(default)]
    pub published_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleFormPayload {
    pub title: ArticleTitle,
    pub slug: ArticleSlug,
    pub content: String,
    pub category_id: Option<CategoryId>,
    pub published_at: Option<NaiveDateTime>,
    pub tag_ids: Vec<TagId>,
}

impl ArticleFormPayload {
    pub fn to_new_article(&self, now: NaiveDateTime) -> NewArticle {
        NewArticle {
            title: self.title.clone(),
            slug: self.slug.clone(),
            content: self.content.clone(),
            category_id: self.category_id,
            published_at: self.published_at,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_changes(&self, now: NaiveDateTime) -> ArticleChanges {
        ArticleChanges {
            title: self.title.clone(),
            slug: self.slug.clone(),
            content: self.content.clone(),
            category_id: self.category_id,
            published_at: self.published_at,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum ArticleFormError {
    #[error("Article form validation failed: {0}")]
    Validation(String),
    #[error("Article form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ArticleFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ArticleFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ArticleForm> for ArticleFormPayload {
    type Error = ArticleFormError;

    fn try_from(value: ArticleForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let category_id = match value.category_id {
            0 => None,
            id => Some(CategoryId::new(id)?),
        };
        let tag_ids = value
            .tag_ids
            .into_iter()
            .map(TagId::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title: ArticleTitle::new(value.title)?,
            slug: ArticleSlug::new(value.slug)?,
            content: value.content,
            category_id,
            published_at: value.published_at,
            tag_ids,
        })
    }
}
