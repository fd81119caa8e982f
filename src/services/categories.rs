use crate::domain::article::Article;
use crate::domain::category::Category;
use crate::domain::types::CategoryId;
use crate::domain::visibility::RequestScope;
use crate::dto::categories::CategoryNode;
use crate::forms::categories::{CategoryForm, CategoryFormPayload};
use crate::pagination::Paginated;
use crate::repository::{ArticleReader, CategoryReader, CategoryWriter};
use crate::services::articles::list_category_articles;

use super::{ServiceError, ServiceResult, repo_failure};

/// Page size of the article list on a category page.
pub const CATEGORY_PAGE_SIZE: usize = 8;

fn parse_category_id(id: i32) -> ServiceResult<CategoryId> {
    CategoryId::new(id).map_err(|_| ServiceError::NotFound)
}

fn find_category<R>(id: CategoryId, repo: &R) -> ServiceResult<Option<Category>>
where
    R: CategoryReader,
{
    repo.get_category_by_id(id)
        .map_err(|e| repo_failure("get category", e))
}

fn ensure_parent_exists<R>(parent_id: Option<CategoryId>, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    let Some(parent_id) = parent_id else {
        return Ok(());
    };
    match find_category(parent_id, repo)? {
        Some(_) => Ok(()),
        None => Err(ServiceError::ValidationFailed(format!(
            "parent category {parent_id} does not exist"
        ))),
    }
}

/// Fails when `parent_id` is `id` itself or one of its descendants.
fn ensure_not_own_ancestor<R>(
    id: CategoryId,
    parent_id: Option<CategoryId>,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryReader,
{
    let mut seen = Vec::new();
    let mut current = parent_id;
    while let Some(ancestor) = current {
        if ancestor == id {
            return Err(ServiceError::ValidationFailed(
                "a category cannot be nested under itself".to_string(),
            ));
        }
        if seen.contains(&ancestor) {
            break;
        }
        seen.push(ancestor);
        current = find_category(ancestor, repo)?.and_then(|c| c.parent_id);
    }
    Ok(())
}

pub fn create_category<R>(
    scope: &RequestScope,
    form: CategoryForm,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    let payload = CategoryFormPayload::try_from(form)?;
    ensure_parent_exists(payload.parent_id, repo)?;

    repo.create_category(&payload.to_new_category(scope.now()))
        .map_err(|e| repo_failure("create category", e))
}

pub fn update_category<R>(
    scope: &RequestScope,
    category_id: i32,
    form: CategoryForm,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = parse_category_id(category_id)?;
    if find_category(category_id, repo)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let payload = CategoryFormPayload::try_from(form)?;
    ensure_parent_exists(payload.parent_id, repo)?;
    ensure_not_own_ancestor(category_id, payload.parent_id, repo)?;

    match repo.update_category(category_id, &payload.to_changes(scope.now())) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => {}
        Err(e) => return Err(repo_failure("update category", e)),
    }

    find_category(category_id, repo)?.ok_or(ServiceError::NotFound)
}

/// Soft-deletes a category that has no live children.
pub fn delete_category<R>(category_id: i32, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = parse_category_id(category_id)?;
    let Some(category) = find_category(category_id, repo)? else {
        return Err(ServiceError::NotFound);
    };

    let children = repo
        .count_child_categories(category_id)
        .map_err(|e| repo_failure("count child categories", e))?;
    if children > 0 {
        return Err(ServiceError::Conflict(format!(
            "category \"{}\" still has {children} subcategories; delete them first",
            category.name
        )));
    }

    match repo.soft_delete_category(category_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("Category {category_id} deleted");
            Ok(())
        }
        Err(e) => Err(repo_failure("delete category", e)),
    }
}

pub fn category_tree<R>(repo: &R) -> ServiceResult<Vec<CategoryNode>>
where
    R: CategoryReader,
{
    let categories = repo
        .list_categories()
        .map_err(|e| repo_failure("list categories", e))?;
    Ok(CategoryNode::build_tree(categories))
}

/// A category with one page of its newest visible articles.
pub fn show_category<R>(
    scope: &RequestScope,
    category_id: i32,
    page: usize,
    repo: &R,
) -> ServiceResult<(Category, Paginated<Article>)>
where
    R: CategoryReader + ArticleReader,
{
    let id = parse_category_id(category_id)?;
    let category = find_category(id, repo)?.ok_or(ServiceError::NotFound)?;
    let articles = list_category_articles(scope, category_id, page, CATEGORY_PAGE_SIZE, repo)?;
    Ok((category, articles))
}
