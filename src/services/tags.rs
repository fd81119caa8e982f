use crate::domain::tag::Tag;
use crate::domain::types::TagId;
use crate::domain::visibility::RequestScope;
use crate::forms::tags::{TagForm, TagFormPayload};
use crate::repository::{TagReader, TagWriter};

use super::{ServiceError, ServiceResult, repo_failure};

pub const HOT_TAGS_LIMIT: usize = 10;

pub fn create_tag<R>(scope: &RequestScope, form: TagForm, repo: &R) -> ServiceResult<Tag>
where
    R: TagWriter,
{
    let payload = TagFormPayload::try_from(form)?;
    repo.create_tag(&payload.to_new_tag(scope.now()))
        .map_err(|e| repo_failure("create tag", e))
}

pub fn list_tags<R>(repo: &R) -> ServiceResult<Vec<Tag>>
where
    R: TagReader,
{
    repo.list_tags().map_err(|e| repo_failure("list tags", e))
}

/// Most used tags first.
pub fn hot_tags<R>(limit: usize, repo: &R) -> ServiceResult<Vec<Tag>>
where
    R: TagReader,
{
    repo.list_hot_tags(limit)
        .map_err(|e| repo_failure("list hot tags", e))
}

pub fn delete_tag<R>(tag_id: i32, repo: &R) -> ServiceResult<()>
where
    R: TagWriter,
{
    let tag_id = TagId::new(tag_id).map_err(|_| ServiceError::NotFound)?;

    match repo.soft_delete_tag(tag_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("Tag {tag_id} deleted");
            Ok(())
        }
        Err(e) => Err(repo_failure("delete tag", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ArticleId, Taggable, VisitorKey};
    use crate::domain::visibility::{AdminPolicy, CallerContext};
    use crate::repository::test::{TestRepository, at, tag};

    fn scope() -> RequestScope {
        RequestScope::at(
            CallerContext::admin(VisitorKey::new("admin").unwrap()),
            &AdminPolicy,
            at(50),
        )
    }

    #[test]
    fn hot_tags_follow_usage() {
        let repo = TestRepository::new(vec![], vec![], vec![tag(1, "rust"), tag(2, "sqlite")]);
        let two = TagId::new(2).unwrap();
        repo.sync_tags(Taggable::Article(ArticleId::new(1).unwrap()), &[two])
            .unwrap();
        repo.sync_tags(Taggable::Article(ArticleId::new(2).unwrap()), &[two])
            .unwrap();

        let hot = hot_tags(HOT_TAGS_LIMIT, &repo).unwrap();
        assert_eq!(hot[0].id, 2);
        assert_eq!(hot[0].number, 2);
        assert_eq!(hot_tags(1, &repo).unwrap().len(), 1);
    }

    #[test]
    fn create_and_delete() {
        let repo = TestRepository::default();
        let created = create_tag(&scope(), TagForm { name: " web ".into() }, &repo).unwrap();
        assert_eq!(created.name.as_str(), "web");
        assert_eq!(list_tags(&repo).unwrap().len(), 1);

        assert_eq!(delete_tag(created.id.get(), &repo), Ok(()));
        assert!(list_tags(&repo).unwrap().is_empty());
        assert_eq!(delete_tag(created.id.get(), &repo), Err(ServiceError::NotFound));
        assert!(create_tag(&scope(), TagForm { name: String::new() }, &repo).is_err());
    }
}
