use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text, Timestamp};
use diesel::sqlite::Sqlite;

use crate::domain::article::{ArchiveEntry, Article, ArticleChanges, NewArticle};
use crate::domain::types::{ArchiveMonth, ArticleId, ArticleSlug, ViewCount};
use crate::db::fold_case;
use crate::domain::visibility::Visibility;
use crate::models::article::{
    Article as DbArticle, ArticleChanges as DbArticleChanges, NewArticle as DbNewArticle,
    UNCATEGORIZED,
};
use crate::repository::{
    ArticleListQuery, ArticleOrder, ArticleReader, ArticleSortColumn, ArticleWriter,
    DieselRepository, RepositoryResult, SortDirection,
};
use crate::schema::articles;

type BoxedArticles = articles::BoxedQuery<'static, Sqlite>;

/// Live (not soft-deleted) articles filtered by `visibility`.
fn visible_articles(visibility: Visibility) -> BoxedArticles {
    let query = articles::table
        .filter(articles::deleted_at.is_null())
        .into_boxed::<Sqlite>();

    match visibility {
        Visibility::IncludeDrafts => query,
        Visibility::PublishedOnly { as_of } => query
            .filter(articles::published_at.is_not_null())
            .filter(articles::published_at.le(as_of)),
    }
}

fn filtered_articles(query: &ArticleListQuery) -> BoxedArticles {
    let mut items = visible_articles(query.visibility);

    if let Some(category_id) = query.category_id {
        items = items.filter(articles::category_id.eq(category_id.get()));
    }

    if query.categorized_only {
        items = items.filter(articles::category_id.ne(UNCATEGORIZED));
    }

    // Both sides are folded, so matching is case-insensitive beyond ASCII.
    if let Some(needle) = &query.title_contains {
        let pattern = format!("%{}%", needle.trim().to_lowercase());
        items = items.filter(fold_case(articles::title).like(pattern));
    }

    if let Some(keyword) = &query.keyword {
        let pattern = format!("%{}%", keyword.trim().to_lowercase());
        items = items.filter(
            fold_case(articles::title)
                .like(pattern.clone())
                .or(fold_case(articles::content).like(pattern)),
        );
    }

    if let Some(month) = query.archive_month {
        let (start, end) = month.bounds();
        items = items
            .filter(articles::created_at.ge(start))
            .filter(articles::created_at.lt(end));
    }

    items
}

/// Applies the requested order, breaking ties by id in the same direction.
fn ordered(items: BoxedArticles, order: ArticleOrder) -> BoxedArticles {
    use ArticleSortColumn as Column;
    use SortDirection::{Asc, Desc};

    let items = match (order.column, order.direction) {
        (Column::Id, Asc) => return items.order(articles::id.asc()),
        (Column::Id, Desc) => return items.order(articles::id.desc()),
        (Column::CreatedAt, Asc) => items.order(articles::created_at.asc()),
        (Column::CreatedAt, Desc) => items.order(articles::created_at.desc()),
        (Column::PublishedAt, Asc) => items.order(articles::published_at.asc()),
        (Column::PublishedAt, Desc) => items.order(articles::published_at.desc()),
        (Column::ViewCount, Asc) => items.order(articles::view_count.asc()),
        (Column::ViewCount, Desc) => items.order(articles::view_count.desc()),
        (Column::Title, Asc) => items.order(articles::title.asc()),
        (Column::Title, Desc) => items.order(articles::title.desc()),
    };

    match order.direction {
        Asc => items.then_order_by(articles::id.asc()),
        Desc => items.then_order_by(articles::id.desc()),
    }
}

fn into_domain(rows: Vec<DbArticle>) -> RepositoryResult<Vec<Article>> {
    Ok(rows
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<Article>, _>>()?)
}

#[derive(QueryableByName)]
struct ArchiveRow {
    #[diesel(sql_type = Text)]
    archive: String,
    #[diesel(sql_type = BigInt)]
    total: i64,
}

const ARCHIVE_SQL_HEAD: &str = "SELECT strftime('%Y-%m', created_at) AS archive, COUNT(*) AS total \
     FROM articles \
     WHERE deleted_at IS NULL AND category_id <> 0";

const ARCHIVE_SQL_TAIL: &str = " GROUP BY archive ORDER BY archive DESC LIMIT ?";

impl ArticleReader for DieselRepository {
    fn get_article_by_id(
        &self,
        id: ArticleId,
        visibility: Visibility,
    ) -> RepositoryResult<Option<Article>> {
        let mut conn = self.conn()?;

        let article = visible_articles(visibility)
            .filter(articles::id.eq(id.get()))
            .first::<DbArticle>(&mut conn)
            .optional()?;

        let article = article.map(TryInto::try_into).transpose()?;
        Ok(article)
    }

    fn get_article_by_slug(
        &self,
        slug: &ArticleSlug,
        visibility: Visibility,
    ) -> RepositoryResult<Option<Article>> {
        let mut conn = self.conn()?;

        let article = visible_articles(visibility)
            .filter(articles::slug.eq(slug.as_str().to_string()))
            .first::<DbArticle>(&mut conn)
            .optional()?;

        let article = article.map(TryInto::try_into).transpose()?;
        Ok(article)
    }

    fn list_articles(&self, query: ArticleListQuery) -> RepositoryResult<(usize, Vec<Article>)> {
        let mut conn = self.conn()?;

        let total = filtered_articles(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = ordered(filtered_articles(&query), query.order);

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(i64::try_from(pagination.offset()).unwrap_or(i64::MAX))
                .limit(i64::try_from(pagination.limit()).unwrap_or(i64::MAX));
        }

        let items = into_domain(items.load::<DbArticle>(&mut conn)?)?;

        Ok((total, items))
    }

    fn archive_summary(
        &self,
        visibility: Visibility,
        limit: usize,
    ) -> RepositoryResult<Vec<ArchiveEntry>> {
        let mut conn = self.conn()?;
        let limit = limit as i64;

        let rows = match visibility {
            Visibility::IncludeDrafts => {
                diesel::sql_query(format!("{ARCHIVE_SQL_HEAD}{ARCHIVE_SQL_TAIL}"))
                    .bind::<BigInt, _>(limit)
                    .load::<ArchiveRow>(&mut conn)?
            }
            Visibility::PublishedOnly { as_of } => diesel::sql_query(format!(
                "{ARCHIVE_SQL_HEAD} AND published_at IS NOT NULL AND published_at <= ?{ARCHIVE_SQL_TAIL}"
            ))
            .bind::<Timestamp, _>(as_of)
            .bind::<BigInt, _>(limit)
            .load::<ArchiveRow>(&mut conn)?,
        };

        rows.into_iter()
            .map(|row| -> RepositoryResult<ArchiveEntry> {
                Ok(ArchiveEntry {
                    month: row.archive.parse::<ArchiveMonth>()?,
                    count: row.total as usize,
                })
            })
            .collect()
    }
}

impl ArticleWriter for DieselRepository {
    fn create_article(&self, article: &NewArticle) -> RepositoryResult<Article> {
        let mut conn = self.conn()?;
        let db_article: DbNewArticle = article.into();

        let created = diesel::insert_into(articles::table)
            .values(&db_article)
            .get_result::<DbArticle>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_article(&self, id: ArticleId, changes: &ArticleChanges) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let db_changes: DbArticleChanges = changes.into();

        let affected = diesel::update(
            articles::table
                .filter(articles::id.eq(id.get()))
                .filter(articles::deleted_at.is_null()),
        )
        .set(&db_changes)
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn soft_delete_article(&self, id: ArticleId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let now: NaiveDateTime = Utc::now().naive_utc();

        let affected = diesel::update(
            articles::table
                .filter(articles::id.eq(id.get()))
                .filter(articles::deleted_at.is_null()),
        )
        .set(articles::deleted_at.eq(Some(now)))
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn restore_article(&self, id: ArticleId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let affected = diesel::update(
            articles::table
                .filter(articles::id.eq(id.get()))
                .filter(articles::deleted_at.is_not_null()),
        )
        .set(articles::deleted_at.eq(None::<NaiveDateTime>))
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn increment_view_count(&self, id: ArticleId) -> RepositoryResult<ViewCount> {
        let mut conn = self.conn()?;

        // Single statement, so concurrent increments cannot lose updates.
        let count = diesel::update(
            articles::table
                .filter(articles::id.eq(id.get()))
                .filter(articles::deleted_at.is_null()),
        )
        .set(articles::view_count.eq(articles::view_count + 1))
        .returning(articles::view_count)
        .get_result::<i32>(&mut conn)?;

        Ok(ViewCount::new(count)?)
    }
}
