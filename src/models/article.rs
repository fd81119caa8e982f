use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::article::{
    Article as DomainArticle, ArticleChanges as DomainArticleChanges,
    NewArticle as DomainNewArticle,
};
use crate::domain::types::{
    ArticleSlug, ArticleTitle, CategoryId, TypeConstraintError, ViewCount,
};

/// Stored value of `category_id` for uncategorized articles.
pub const UNCATEGORIZED: i32 = 0;

/// Diesel model representing the `articles` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::articles)]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category_id: i32,
    pub published_at: Option<NaiveDateTime>,
    pub view_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

/// Insertable form of [`Article`]. `view_count` starts at the column default.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::articles)]
pub struct NewArticle<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub content: &'a str,
    pub category_id: i32,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset replacing every editable column, including clearing
/// `published_at` back to a draft.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::articles, treat_none_as_null = true)]
pub struct ArticleChanges<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub content: &'a str,
    pub category_id: i32,
    pub published_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

fn category_to_column(category_id: Option<CategoryId>) -> i32 {
    category_id.map_or(UNCATEGORIZED, CategoryId::get)
}

impl TryFrom<Article> for DomainArticle {
    type Error = TypeConstraintError;

    fn try_from(article: Article) -> Result<Self, Self::Error> {
        let category_id = match article.category_id {
            UNCATEGORIZED => None,
            id => Some(CategoryId::new(id)?),
        };

        Ok(Self {
            id: article.id.try_into()?,
            title: ArticleTitle::new(article.title)?,
            slug: ArticleSlug::new(article.slug)?,
            content: article.content,
            category_id,
            published_at: article.published_at,
            view_count: ViewCount::new(article.view_count)?,
            created_at: article.created_at,
            updated_at: article.updated_at,
            deleted_at: article.deleted_at,
        })
    }
}

impl<'a> From<&'a DomainNewArticle> for NewArticle<'a> {
    fn from(article: &'a DomainNewArticle) -> Self {
        Self {
            title: article.title.as_str(),
            slug: article.slug.as_str(),
            content: article.content.as_str(),
            category_id: category_to_column(article.category_id),
            published_at: article.published_at,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

impl<'a> From<&'a DomainArticleChanges> for ArticleChanges<'a> {
    fn from(changes: &'a DomainArticleChanges) -> Self {
        Self {
            title: changes.title.as_str(),
            slug: changes.slug.as_str(),
            content: changes.content.as_str(),
            category_id: category_to_column(changes.category_id),
            published_at: changes.published_at,
            updated_at: changes.updated_at,
        }
    }
}
