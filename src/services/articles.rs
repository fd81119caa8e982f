use crate::domain::article::{ArchiveEntry, Article};
use crate::domain::types::{ArchiveMonth, ArticleId, ArticleSlug, CategoryId, TagId, Taggable};
use crate::domain::visibility::{RequestScope, Visibility};
use crate::forms::articles::{ArticleForm, ArticleFormPayload};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated, Pagination};
use crate::repository::{
    ArticleListQuery, ArticleOrder, ArticleReader, ArticleSortColumn, ArticleWriter, TagReader,
    TagWriter, VisitorWriter,
};
use crate::services::views::record_view;

use super::{ServiceError, ServiceResult, repo_failure};

/// Page size of keyword listings.
pub const KEYWORD_PAGE_SIZE: usize = 8;
/// Number of months shown in the archive sidebar.
pub const ARCHIVE_SUMMARY_LIMIT: usize = 12;
/// Page size of a single archived month.
pub const ARCHIVE_PAGE_SIZE: usize = 8;
pub const HOT_ARTICLES_LIMIT: usize = 3;

fn parse_article_id(id: i32) -> ServiceResult<ArticleId> {
    ArticleId::new(id).map_err(|_| ServiceError::NotFound)
}

/// Looks up an article the caller is allowed to see.
fn find_visible<R>(scope: &RequestScope, id: ArticleId, repo: &R) -> ServiceResult<Article>
where
    R: ArticleReader,
{
    match repo.get_article_by_id(id, scope.visibility()) {
        Ok(Some(article)) => Ok(article),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(repo_failure("get article", e)),
    }
}

fn page_of<R>(query: ArticleListQuery, repo: &R) -> ServiceResult<Paginated<Article>>
where
    R: ArticleReader,
{
    let pagination = query
        .pagination
        .unwrap_or_else(|| Pagination::new(1, DEFAULT_ITEMS_PER_PAGE));
    let (total, items) = repo
        .list_articles(query)
        .map_err(|e| repo_failure("list articles", e))?;
    Ok(Paginated::from_total(items, pagination, total))
}

/// Fetches an article by its numeric id. Drafts are reported as missing
/// unless the caller is privileged.
pub fn get_article_by_id<R>(scope: &RequestScope, id: i32, repo: &R) -> ServiceResult<Article>
where
    R: ArticleReader,
{
    let id = parse_article_id(id)?;
    find_visible(scope, id, repo)
}

/// Fetches an article by slug and counts the view.
///
/// The returned article carries the incremented view counter when the
/// increment succeeded; tracking failures never fail the fetch.
pub fn get_article_by_slug<R>(scope: &RequestScope, slug: &str, repo: &R) -> ServiceResult<Article>
where
    R: ArticleReader + ArticleWriter + VisitorWriter,
{
    let slug = ArticleSlug::new(slug).map_err(|_| ServiceError::NotFound)?;

    let mut article = match repo.get_article_by_slug(&slug, scope.visibility()) {
        Ok(Some(article)) => article,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(repo_failure("get article by slug", e)),
    };

    if let Some(count) = record_view(scope, article.id, repo) {
        article.view_count = count;
    }

    Ok(article)
}

/// Paginated listing of every visible article.
pub fn page_articles<R>(
    scope: &RequestScope,
    page: usize,
    per_page: usize,
    order: ArticleOrder,
    repo: &R,
) -> ServiceResult<Paginated<Article>>
where
    R: ArticleReader,
{
    let query = ArticleListQuery::new(scope.visibility())
        .order(order)
        .paginate(page, per_page);
    page_of(query, repo)
}

/// Title search, newest publication first.
///
/// Drafts are included for every caller. `keyword` is used as a `LIKE`
/// pattern, so `%` and `_` act as wildcards rather than literal characters.
pub fn search_articles<R>(keyword: &str, repo: &R) -> ServiceResult<Vec<Article>>
where
    R: ArticleReader,
{
    let query = ArticleListQuery::new(Visibility::IncludeDrafts)
        .title_contains(keyword)
        .order(ArticleOrder::desc(ArticleSortColumn::PublishedAt));
    let (_total, items) = repo
        .list_articles(query)
        .map_err(|e| repo_failure("search articles", e))?;
    Ok(items)
}

pub fn list_category_articles<R>(
    scope: &RequestScope,
    category_id: i32,
    page: usize,
    per_page: usize,
    repo: &R,
) -> ServiceResult<Paginated<Article>>
where
    R: ArticleReader,
{
    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;
    let query = ArticleListQuery::new(scope.visibility())
        .category(category_id)
        .categorized_only()
        .order(ArticleOrder::desc(ArticleSortColumn::Id))
        .paginate(page, per_page);
    page_of(query, repo)
}

/// The newest categorized articles.
pub fn list_latest_articles<R>(
    scope: &RequestScope,
    per_page: usize,
    repo: &R,
) -> ServiceResult<Vec<Article>>
where
    R: ArticleReader,
{
    let query = ArticleListQuery::new(scope.visibility())
        .categorized_only()
        .order(ArticleOrder::desc(ArticleSortColumn::Id))
        .paginate(1, per_page);
    Ok(page_of(query, repo)?.items)
}

/// The most viewed categorized articles.
pub fn list_hot_articles<R>(
    scope: &RequestScope,
    limit: usize,
    repo: &R,
) -> ServiceResult<Vec<Article>>
where
    R: ArticleReader,
{
    let query = ArticleListQuery::new(scope.visibility())
        .categorized_only()
        .order(ArticleOrder::desc(ArticleSortColumn::ViewCount))
        .paginate(1, limit);
    Ok(page_of(query, repo)?.items)
}

/// Categorized articles whose title or content contains `keyword`, eight
/// per page. As in [`search_articles`], `%` and `_` in `keyword` are
/// wildcards.
pub fn list_keyword_articles<R>(
    scope: &RequestScope,
    keyword: &str,
    page: usize,
    repo: &R,
) -> ServiceResult<Paginated<Article>>
where
    R: ArticleReader,
{
    let query = ArticleListQuery::new(scope.visibility())
        .keyword(keyword)
        .categorized_only()
        .order(ArticleOrder::desc(ArticleSortColumn::Id))
        .paginate(page, KEYWORD_PAGE_SIZE);
    page_of(query, repo)
}

/// Article counts per creation month, newest month first, at most `limit`
/// months.
pub fn archive_summary<R>(
    scope: &RequestScope,
    limit: usize,
    repo: &R,
) -> ServiceResult<Vec<ArchiveEntry>>
where
    R: ArticleReader,
{
    repo.archive_summary(scope.visibility(), limit)
        .map_err(|e| repo_failure("build archive summary", e))
}

/// Categorized articles created in `year`-`month`.
pub fn archived_articles<R>(
    scope: &RequestScope,
    year: i32,
    month: u32,
    page: usize,
    per_page: usize,
    repo: &R,
) -> ServiceResult<Paginated<Article>>
where
    R: ArticleReader,
{
    let month = ArchiveMonth::new(year, month)?;
    let query = ArticleListQuery::new(scope.visibility())
        .archive_month(month)
        .categorized_only()
        .paginate(page, per_page);
    page_of(query, repo)
}

/// Replaces the tag set of an article the caller can see.
pub fn sync_article_tags<R>(
    scope: &RequestScope,
    article_id: i32,
    tag_ids: &[i32],
    repo: &R,
) -> ServiceResult<usize>
where
    R: ArticleReader + TagWriter,
{
    let article = find_visible(scope, parse_article_id(article_id)?, repo)?;
    let tag_ids = tag_ids
        .iter()
        .copied()
        .map(TagId::new)
        .collect::<Result<Vec<_>, _>>()?;

    repo.sync_tags(Taggable::Article(article.id), &tag_ids)
        .map_err(|e| repo_failure("sync article tags", e))
}

/// Tag ids attached to an article.
pub fn article_tag_ids<R>(
    scope: &RequestScope,
    article_id: i32,
    repo: &R,
) -> ServiceResult<Vec<TagId>>
where
    R: ArticleReader + TagReader,
{
    let article = find_visible(scope, parse_article_id(article_id)?, repo)?;
    let tags = repo
        .list_tags_for(Taggable::Article(article.id))
        .map_err(|e| repo_failure("list article tags", e))?;
    Ok(tags.into_iter().map(|tag| tag.id).collect())
}

/// Soft-deletes an article. Drafts the caller cannot see are reported as
/// missing.
pub fn destroy_article<R>(scope: &RequestScope, article_id: i32, repo: &R) -> ServiceResult<()>
where
    R: ArticleReader + ArticleWriter,
{
    let article = find_visible(scope, parse_article_id(article_id)?, repo)?;

    match repo.soft_delete_article(article.id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("Article {} deleted", article.id);
            Ok(())
        }
        Err(e) => Err(repo_failure("delete article", e)),
    }
}

/// Brings back a soft-deleted article.
pub fn restore_article<R>(article_id: i32, repo: &R) -> ServiceResult<()>
where
    R: ArticleWriter,
{
    let article_id = parse_article_id(article_id)?;

    match repo.restore_article(article_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("Article {article_id} restored");
            Ok(())
        }
        Err(e) => Err(repo_failure("restore article", e)),
    }
}

pub fn create_article<R>(scope: &RequestScope, form: ArticleForm, repo: &R) -> ServiceResult<Article>
where
    R: ArticleWriter + TagWriter,
{
    let payload = ArticleFormPayload::try_from(form)?;

    let article = repo
        .create_article(&payload.to_new_article(scope.now()))
        .map_err(|e| repo_failure("create article", e))?;

    if !payload.tag_ids.is_empty() {
        repo.sync_tags(Taggable::Article(article.id), &payload.tag_ids)
            .map_err(|e| repo_failure("sync article tags", e))?;
    }

    Ok(article)
}

/// Replaces the editable fields and the tag set of a visible article.
pub fn update_article<R>(
    scope: &RequestScope,
    article_id: i32,
    form: ArticleForm,
    repo: &R,
) -> ServiceResult<Article>
where
    R: ArticleReader + ArticleWriter + TagWriter,
{
    let article = find_visible(scope, parse_article_id(article_id)?, repo)?;
    let payload = ArticleFormPayload::try_from(form)?;

    match repo.update_article(article.id, &payload.to_changes(scope.now())) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => {}
        Err(e) => return Err(repo_failure("update article", e)),
    }

    repo.sync_tags(Taggable::Article(article.id), &payload.tag_ids)
        .map_err(|e| repo_failure("sync article tags", e))?;

    match repo.get_article_by_id(article.id, Visibility::IncludeDrafts) {
        Ok(Some(article)) => Ok(article),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(repo_failure("reload article", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::VisitorKey;
    use crate::domain::visibility::{AdminPolicy, CallerContext};
    use crate::repository::test::{TestRepository, article, at, tag};
    use crate::repository::{TagReader, VisitorReader};

    const NOW: i64 = 1_000_000;

    fn visitor() -> VisitorKey {
        VisitorKey::new("10.0.0.1").unwrap()
    }

    fn anonymous() -> RequestScope {
        RequestScope::at(CallerContext::anonymous(visitor()), &AdminPolicy, at(NOW))
    }

    fn admin() -> RequestScope {
        RequestScope::at(CallerContext::admin(visitor()), &AdminPolicy, at(NOW))
    }

    fn repo() -> TestRepository {
        TestRepository::new(
            vec![
                article(1, "published", Some(1), Some(at(10)), at(100)),
                article(2, "uncategorized", None, Some(at(10)), at(200)),
                article(3, "scheduled", Some(1), Some(at(NOW + 1)), at(300)),
                article(5, "hello-world", Some(2), None, at(400)),
            ],
            vec![],
            vec![tag(1, "rust"), tag(2, "sqlite")],
        )
    }

    #[test]
    fn drafts_are_hidden_from_anonymous_callers() {
        let repo = repo();
        assert_eq!(
            get_article_by_id(&anonymous(), 5, &repo),
            Err(ServiceError::NotFound)
        );
        assert_eq!(
            get_article_by_id(&anonymous(), 3, &repo),
            Err(ServiceError::NotFound)
        );
        assert_eq!(get_article_by_id(&admin(), 5, &repo).unwrap().id, 5);
        assert_eq!(
            get_article_by_id(&anonymous(), -4, &repo),
            Err(ServiceError::NotFound)
        );
    }

    #[test]
    fn slug_fetch_counts_a_view_only_when_found() {
        let repo = repo();

        assert_eq!(
            get_article_by_slug(&anonymous(), "hello-world", &repo),
            Err(ServiceError::NotFound)
        );
        assert!(repo.visits().is_empty());

        let article = get_article_by_slug(&admin(), "hello-world", &repo).unwrap();
        assert_eq!(article.view_count, 1);
        let visits = repo.visits();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].article_id, 5);
        assert_eq!(visits[0].visitor, visitor());
        assert_eq!(visits[0].visited_at, at(NOW));
    }

    #[test]
    fn failing_visitor_log_does_not_fail_the_fetch() {
        let repo = repo().failing_visitor_log();
        let article = get_article_by_slug(&anonymous(), "published", &repo).unwrap();
        assert_eq!(article.view_count, 1);
        assert_eq!(repo.count_visits(article.id).unwrap(), 0);
    }

    #[test]
    fn failing_increment_still_logs_the_visit() {
        let repo = repo().failing_increment();
        let article = get_article_by_slug(&anonymous(), "published", &repo).unwrap();
        assert_eq!(article.view_count, 0);
        assert_eq!(repo.count_visits(article.id).unwrap(), 1);
    }

    #[test]
    fn search_ignores_visibility() {
        let repo = repo();
        let found = search_articles("HELLO", &repo).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 5);
    }

    #[test]
    fn listings_skip_uncategorized_articles() {
        let repo = repo();
        let latest = list_latest_articles(&admin(), 10, &repo).unwrap();
        let ids: Vec<i32> = latest.iter().map(|a| a.id.get()).collect();
        assert_eq!(ids, vec![5, 3, 1]);

        let hot = list_hot_articles(&anonymous(), HOT_ARTICLES_LIMIT, &repo).unwrap();
        assert_eq!(hot.len(), 1);

        let keyword = list_keyword_articles(&admin(), "Body", 1, &repo).unwrap();
        assert_eq!(keyword.total, 3);
        assert!(keyword.items.iter().all(|a| a.category_id.is_some()));
    }

    #[test]
    fn category_listing_is_paginated_by_id() {
        let repo = repo();
        let first = list_category_articles(&admin(), 1, 1, 1, &repo).unwrap();
        assert_eq!(first.total, 2);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items[0].id, 3);

        let second = list_category_articles(&admin(), 1, 2, 1, &repo).unwrap();
        assert_eq!(second.page, 2);
        assert_eq!(second.items[0].id, 1);
    }

    #[test]
    fn page_far_past_the_end_is_empty() {
        let repo = repo();
        let page = list_keyword_articles(&admin(), "Body", usize::MAX / 4, &repo).unwrap();
        assert_eq!(page.total, 3);
        assert!(page.items.is_empty());
    }

    #[test]
    fn archived_page_rejects_invalid_months() {
        let repo = repo();
        assert!(matches!(
            archived_articles(&admin(), 2024, 13, 1, ARCHIVE_PAGE_SIZE, &repo),
            Err(ServiceError::ValidationFailed(_))
        ));
        let page = archived_articles(&admin(), 1970, 1, 1, ARCHIVE_PAGE_SIZE, &repo).unwrap();
        assert_eq!(page.total, 3);
    }

    #[test]
    fn sync_tags_is_idempotent_and_scoped_by_visibility() {
        let repo = repo();
        assert_eq!(
            sync_article_tags(&anonymous(), 5, &[1], &repo),
            Err(ServiceError::NotFound)
        );

        assert_eq!(sync_article_tags(&admin(), 5, &[1, 2, 2], &repo), Ok(2));
        assert_eq!(sync_article_tags(&admin(), 5, &[1, 2], &repo), Ok(2));
        let ids = article_tag_ids(&admin(), 5, &repo).unwrap();
        assert_eq!(ids.len(), 2);

        assert_eq!(sync_article_tags(&admin(), 5, &[2], &repo), Ok(1));
        let tags = repo.list_tags_for(Taggable::Article(ArticleId::new(5).unwrap()));
        assert_eq!(tags.unwrap().len(), 1);

        assert!(matches!(
            sync_article_tags(&admin(), 5, &[9], &repo),
            Err(ServiceError::ValidationFailed(_))
        ));
    }

    #[test]
    fn destroy_hidden_draft_is_not_found() {
        let repo = repo();
        assert_eq!(
            destroy_article(&anonymous(), 5, &repo),
            Err(ServiceError::NotFound)
        );
        assert!(repo.raw_article(5).unwrap().deleted_at.is_none());

        assert_eq!(destroy_article(&admin(), 5, &repo), Ok(()));
        assert!(repo.raw_article(5).unwrap().deleted_at.is_some());
        assert_eq!(
            get_article_by_id(&admin(), 5, &repo),
            Err(ServiceError::NotFound)
        );

        assert_eq!(restore_article(5, &repo), Ok(()));
        assert_eq!(restore_article(5, &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn create_and_update_sync_the_form_tags() {
        let repo = repo();
        let form = ArticleForm {
            title: "New post".into(),
            slug: "new-post".into(),
            content: "text".into(),
            category_id: 1,
            published_at: None,
            tag_ids: vec![1],
        };
        let created = create_article(&admin(), form, &repo).unwrap();
        assert_eq!(created.created_at, at(NOW));
        assert_eq!(repo.get_tag_by_id(TagId::new(1).unwrap()).unwrap().unwrap().number, 1);

        let form = ArticleForm {
            title: "Renamed".into(),
            slug: "new-post".into(),
            content: "text".into(),
            category_id: 0,
            published_at: Some(at(5)),
            tag_ids: vec![2],
        };
        let updated = update_article(&admin(), created.id.get(), form, &repo).unwrap();
        assert_eq!(updated.title.as_str(), "Renamed");
        assert_eq!(updated.category_id, None);
        assert_eq!(
            article_tag_ids(&admin(), created.id.get(), &repo).unwrap(),
            vec![TagId::new(2).unwrap()]
        );
    }

    #[test]
    fn duplicate_slug_is_a_conflict() {
        let repo = repo();
        let form = ArticleForm {
            title: "Copy".into(),
            slug: "published".into(),
            content: String::new(),
            category_id: 0,
            published_at: None,
            tag_ids: vec![],
        };
        assert!(matches!(
            create_article(&admin(), form, &repo),
            Err(ServiceError::Conflict(_))
        ));
    }
}
