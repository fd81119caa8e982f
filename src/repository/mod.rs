use crate::db::{DbConnection, DbPool};
use crate::domain::article::{ArchiveEntry, Article, ArticleChanges, NewArticle};
use crate::domain::category::{Category, CategoryChanges, NewCategory};
use crate::domain::tag::{NewTag, Tag};
use crate::domain::types::{
    ArchiveMonth, ArticleId, ArticleSlug, CategoryId, TagId, Taggable, ViewCount,
};
use crate::domain::visibility::Visibility;
use crate::domain::visitor::NewVisit;
use crate::pagination::Pagination;

pub mod article;
pub mod category;
pub mod errors;
pub mod tag;
pub mod visitor;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers and threads.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Columns articles can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArticleSortColumn {
    Id,
    #[default]
    CreatedAt,
    PublishedAt,
    ViewCount,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Sort order of an article listing; defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArticleOrder {
    pub column: ArticleSortColumn,
    pub direction: SortDirection,
}

impl ArticleOrder {
    pub const fn new(column: ArticleSortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    pub const fn desc(column: ArticleSortColumn) -> Self {
        Self::new(column, SortDirection::Desc)
    }
}

/// Query parameters used when listing articles.
#[derive(Debug, Clone)]
pub struct ArticleListQuery {
    /// Draft filter resolved for the current request.
    pub visibility: Visibility,
    /// Restrict to a single category.
    pub category_id: Option<CategoryId>,
    /// Drop uncategorized articles.
    pub categorized_only: bool,
    /// Substring of the title.
    pub title_contains: Option<String>,
    /// Substring of the title or the content.
    pub keyword: Option<String>,
    /// Restrict to articles created in this month.
    pub archive_month: Option<ArchiveMonth>,
    pub order: ArticleOrder,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ArticleListQuery {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            category_id: None,
            categorized_only: false,
            title_contains: None,
            keyword: None,
            archive_month: None,
            order: ArticleOrder::default(),
            pagination: None,
        }
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn categorized_only(mut self) -> Self {
        self.categorized_only = true;
        self
    }
    pub fn title_contains(mut self, needle: impl Into<String>) -> Self {
        self.title_contains = Some(needle.into());
        self
    }
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }
    pub fn archive_month(mut self, month: ArchiveMonth) -> Self {
        self.archive_month = Some(month);
        self
    }
    pub fn order(mut self, order: ArticleOrder) -> Self {
        self.order = order;
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for article entities. Soft-deleted articles are
/// never returned.
pub trait ArticleReader {
    /// Retrieve an article by id if it is visible.
    fn get_article_by_id(
        &self,
        id: ArticleId,
        visibility: Visibility,
    ) -> RepositoryResult<Option<Article>>;
    /// Retrieve an article by its slug if it is visible.
    fn get_article_by_slug(
        &self,
        slug: &ArticleSlug,
        visibility: Visibility,
    ) -> RepositoryResult<Option<Article>>;
    /// List articles matching the supplied query parameters.
    fn list_articles(&self, query: ArticleListQuery) -> RepositoryResult<(usize, Vec<Article>)>;
    /// Count categorized articles per creation month, newest month first.
    fn archive_summary(
        &self,
        visibility: Visibility,
        limit: usize,
    ) -> RepositoryResult<Vec<ArchiveEntry>>;
}

/// Write operations for article entities.
pub trait ArticleWriter {
    /// Persist a new article and return it.
    fn create_article(&self, article: &NewArticle) -> RepositoryResult<Article>;
    /// Replace the editable fields of a live article.
    fn update_article(&self, id: ArticleId, changes: &ArticleChanges) -> RepositoryResult<usize>;
    /// Mark a live article as deleted.
    fn soft_delete_article(&self, id: ArticleId) -> RepositoryResult<usize>;
    /// Undo a soft delete.
    fn restore_article(&self, id: ArticleId) -> RepositoryResult<usize>;
    /// Atomically add one to the view counter and return the new value.
    fn increment_view_count(&self, id: ArticleId) -> RepositoryResult<ViewCount>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List all live categories ordered by id.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a live category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Number of live categories whose parent is `id`.
    fn count_child_categories(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Write operations for category entities. Parent existence and cycles are
/// checked by the callers.
pub trait CategoryWriter {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    fn update_category(
        &self,
        id: CategoryId,
        changes: &CategoryChanges,
    ) -> RepositoryResult<usize>;
    /// Soft-deletes a live category without live children. Fails with
    /// `Conflict` otherwise; the check and the delete are atomic.
    fn soft_delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for tags and their associations.
pub trait TagReader {
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    fn get_tag_by_id(&self, id: TagId) -> RepositoryResult<Option<Tag>>;
    /// Most used tags first.
    fn list_hot_tags(&self, limit: usize) -> RepositoryResult<Vec<Tag>>;
    /// Live tags attached to `taggable`, ordered by id.
    fn list_tags_for(&self, taggable: Taggable) -> RepositoryResult<Vec<Tag>>;
}

/// Write operations for tags and their associations.
pub trait TagWriter {
    fn create_tag(&self, tag: &NewTag) -> RepositoryResult<Tag>;
    fn soft_delete_tag(&self, id: TagId) -> RepositoryResult<usize>;
    /// Replace the whole association set of `taggable` with `tag_ids` in a
    /// single transaction. Returns the number of associations afterwards.
    fn sync_tags(&self, taggable: Taggable, tag_ids: &[TagId]) -> RepositoryResult<usize>;
}

/// Visitor log access.
pub trait VisitorWriter {
    fn log_visit(&self, visit: &NewVisit) -> RepositoryResult<usize>;
}

pub trait VisitorReader {
    fn count_visits(&self, article_id: ArticleId) -> RepositoryResult<usize>;
}
