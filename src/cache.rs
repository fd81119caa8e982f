//! Caller-owned memo of tag names.

use std::collections::HashMap;

use crate::domain::types::{TagId, TagName};
use crate::repository::{RepositoryResult, TagReader};

/// Maps tag ids to names, loading misses from the repository.
///
/// Entries are never refreshed on their own: callers that rename or delete
/// tags must [`invalidate`](Self::invalidate) them.
#[derive(Debug, Default)]
pub struct TagNameCache {
    names: HashMap<TagId, TagName>,
}

impl TagNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of tag `id`, or `None` if it does not exist or was deleted.
    pub fn name_of<R>(&mut self, id: TagId, repo: &R) -> RepositoryResult<Option<TagName>>
    where
        R: TagReader,
    {
        if let Some(name) = self.names.get(&id) {
            return Ok(Some(name.clone()));
        }
        let Some(tag) = repo.get_tag_by_id(id)? else {
            return Ok(None);
        };
        self.names.insert(id, tag.name.clone());
        Ok(Some(tag.name))
    }

    pub fn invalidate(&mut self, id: TagId) {
        self.names.remove(&id);
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::TagWriter;
    use crate::repository::test::{TestRepository, tag};

    #[test]
    fn serves_stale_names_until_invalidated() {
        let repo = TestRepository::new(vec![], vec![], vec![tag(1, "rust")]);
        let id = TagId::new(1).unwrap();
        let mut cache = TagNameCache::new();

        assert_eq!(cache.name_of(id, &repo).unwrap().unwrap(), "rust");
        assert_eq!(cache.len(), 1);

        repo.soft_delete_tag(id).unwrap();
        assert_eq!(cache.name_of(id, &repo).unwrap().unwrap(), "rust");

        cache.invalidate(id);
        assert_eq!(cache.name_of(id, &repo).unwrap(), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let repo = TestRepository::new(vec![], vec![], vec![tag(1, "a"), tag(2, "b")]);
        let mut cache = TagNameCache::new();
        for id in [1, 2, 3] {
            cache.name_of(TagId::new(id).unwrap(), &repo).unwrap();
        }
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
