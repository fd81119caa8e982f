use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ArchiveMonth, ArticleId, ArticleSlug, ArticleTitle, CategoryId, ViewCount,
};

/// Blog article. `category_id` is `None` for uncategorized articles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub id: ArticleId,
    pub title: ArticleTitle,
    pub slug: ArticleSlug,
    pub content: String,
    pub category_id: Option<CategoryId>,
    pub published_at: Option<NaiveDateTime>,
    pub view_count: ViewCount,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Article {
    /// An article is published once its publish time is set and not in the
    /// future relative to `now`.
    pub fn is_published(&self, now: NaiveDateTime) -> bool {
        is_published(self.published_at, now)
    }

    pub fn archive_month(&self) -> ArchiveMonth {
        self.created_at.into()
    }
}

pub(crate) fn is_published(published_at: Option<NaiveDateTime>, now: NaiveDateTime) -> bool {
    published_at.is_some_and(|at| at <= now)
}

/// Data required to insert a new [`Article`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewArticle {
    pub title: ArticleTitle,
    pub slug: ArticleSlug,
    pub content: String,
    pub category_id: Option<CategoryId>,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Full replacement of the editable article fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleChanges {
    pub title: ArticleTitle,
    pub slug: ArticleSlug,
    pub content: String,
    pub category_id: Option<CategoryId>,
    pub published_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

/// Number of articles created in a given month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub month: ArchiveMonth,
    pub count: usize,
}
